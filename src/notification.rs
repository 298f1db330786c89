// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transient user-facing notifications.
//!
//! Outcomes of balance refreshes and transactions are pushed here and drained
//! by the view. Nothing is persisted; the queue keeps at most
//! [`DEFAULT_CAPACITY`] entries and drops the oldest.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::blockchain::NetworkConfig;

pub const DEFAULT_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Title line
    pub message: String,
    /// Body text
    pub description: String,
    /// Transaction hash, when the notification is about one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Block explorer link for `tx_hash`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// "Transaction Successful" with an explorer-linked hash.
    pub fn transaction_success(network: &NetworkConfig, tx_hash: &str) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: "Transaction Successful".to_string(),
            description: format!("Transaction Hash: {tx_hash}"),
            tx_hash: Some(tx_hash.to_string()),
            link: Some(network.explorer_tx_url(tx_hash)),
            created_at: Utc::now(),
        }
    }

    /// "Transaction Failed"; linked when the failure happened after submission.
    pub fn transaction_failure(
        network: &NetworkConfig,
        reason: &str,
        tx_hash: Option<&str>,
    ) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: "Transaction Failed".to_string(),
            description: reason.to_string(),
            tx_hash: tx_hash.map(str::to_string),
            link: tx_hash.map(|hash| network.explorer_tx_url(hash)),
            created_at: Utc::now(),
        }
    }

    pub fn login_failure(reason: &str) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: "Login Failed".to_string(),
            description: reason.to_string(),
            tx_hash: None,
            link: None,
            created_at: Utc::now(),
        }
    }

    pub fn balance_failure(reason: &str) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: "Balance Refresh Failed".to_string(),
            description: reason.to_string(),
            tx_hash: None,
            link: None,
            created_at: Utc::now(),
        }
    }
}

/// Shared, bounded notification queue.
#[derive(Debug, Clone)]
pub struct Notifications {
    inner: Arc<Mutex<VecDeque<Notification>>>,
    capacity: usize,
}

impl Notifications {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&self, notification: Notification) {
        let Ok(mut queue) = self.inner.lock() else {
            tracing::warn!("Notification queue poisoned, dropping notification");
            return;
        };
        if queue.len() == self.capacity {
            queue.pop_front();
        }
        queue.push_back(notification);
    }

    /// Copy of the pending notifications, oldest first.
    pub fn pending(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .map(|queue| queue.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove and return the pending notifications, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .map(|mut queue| queue.drain(..).collect())
            .unwrap_or_default()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
