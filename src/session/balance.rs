// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Balance Refresher
//!
//! Background task that keeps the native balance snapshot in step with the
//! session.
//!
//! ## Strategy
//!
//! The refresher subscribes to the session channel and reacts to edges only:
//! - logged out → logged in: resolve the smart account, read its balance,
//!   store the formatted snapshot
//! - logged in → logged out: clear the snapshot
//!
//! There is no polling and no refresh after transactions; callers wanting a
//! fresh value invoke [`BalanceRefresher::refresh`].
//!
//! ## Failures
//!
//! A failed refresh keeps the previous snapshot, is logged, and is reported as
//! an error notification.

use std::sync::Arc;

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use super::manager::{Session, SessionManager};
use crate::account::{SmartAccountAdapter, SmartAccountError};
use crate::blockchain::{format_ether, ProviderClient, ProviderError};
use crate::notification::{Notification, Notifications};

/// Balance of the session's smart account at the last refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BalanceSnapshot {
    /// Smart-account address the balance belongs to
    #[schema(value_type = String)]
    pub account: Address,
    /// Balance in wei
    pub balance_raw: String,
    /// Balance in ether, full precision
    pub balance: String,
    pub refreshed_at: DateTime<Utc>,
}

/// Keeps [`BalanceSnapshot`] in step with the active session.
pub struct BalanceRefresher {
    sessions: Arc<SessionManager>,
    adapter: Arc<dyn SmartAccountAdapter>,
    provider: Arc<dyn ProviderClient>,
    snapshot: watch::Sender<Option<BalanceSnapshot>>,
    notifications: Notifications,
}

impl BalanceRefresher {
    pub fn new(
        sessions: Arc<SessionManager>,
        adapter: Arc<dyn SmartAccountAdapter>,
        provider: Arc<dyn ProviderClient>,
        notifications: Notifications,
    ) -> Self {
        let (snapshot, _) = watch::channel(None);
        Self {
            sessions,
            adapter,
            provider,
            snapshot,
            notifications,
        }
    }

    pub fn snapshot(&self) -> Option<BalanceSnapshot> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<BalanceSnapshot>> {
        self.snapshot.subscribe()
    }

    /// Refresh the balance of the active session now.
    pub async fn refresh(&self) -> Result<BalanceSnapshot, BalanceError> {
        let session = self.sessions.current().ok_or(BalanceError::NotLoggedIn)?;
        self.refresh_session(&session).await
    }

    async fn refresh_session(&self, session: &Arc<Session>) -> Result<BalanceSnapshot, BalanceError> {
        match self.query(session).await {
            Ok(snapshot) => {
                // Checked under the snapshot lock: a logout published after
                // this store is followed by the watcher's clear.
                let stored = self.snapshot.send_if_modified(|current| {
                    if !self.sessions.is_current(session) {
                        return false;
                    }
                    *current = Some(snapshot.clone());
                    true
                });
                if stored {
                    tracing::debug!(
                        account = %snapshot.account,
                        balance = %snapshot.balance,
                        "Balance refreshed"
                    );
                } else {
                    tracing::debug!("Discarding balance for ended session");
                }
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Balance refresh failed");
                self.notifications
                    .push(Notification::balance_failure(&e.to_string()));
                Err(e)
            }
        }
    }

    async fn query(&self, session: &Session) -> Result<BalanceSnapshot, BalanceError> {
        let account = session
            .account_address(self.adapter.as_ref())
            .await
            .map_err(BalanceError::Account)?;

        let wei = self
            .provider
            .get_balance(account)
            .await
            .map_err(BalanceError::Query)?;

        Ok(BalanceSnapshot {
            account,
            balance_raw: wei.to_string(),
            balance: format_ether(wei),
            refreshed_at: Utc::now(),
        })
    }

    /// Spawn the session watcher as a background task.
    pub fn spawn(self: &Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(self).run(shutdown))
    }

    /// React to session transitions until the token is cancelled.
    ///
    /// Cancelling drops the subscription.
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        tracing::info!("Balance refresher starting");

        let mut sessions = self.sessions.subscribe();
        let mut last: Option<Arc<Session>> = None;

        loop {
            let current = sessions.borrow_and_update().clone();
            self.on_session_change(&mut last, current).await;

            tokio::select! {
                changed = sessions.changed() => {
                    if changed.is_err() {
                        tracing::info!("Session channel closed, balance refresher stopping");
                        return;
                    }
                },
                _ = shutdown.cancelled() => {
                    tracing::info!("Balance refresher shutting down");
                    return;
                }
            }
        }
    }

    async fn on_session_change(
        &self,
        last: &mut Option<Arc<Session>>,
        current: Option<Arc<Session>>,
    ) {
        let unchanged = match (last.as_ref(), current.as_ref()) {
            (Some(prev), Some(next)) => Arc::ptr_eq(prev, next),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        if last.is_some() {
            self.snapshot.send_replace(None);
        }
        *last = current.clone();

        if let Some(session) = current {
            // Failures are already logged and reported as notifications.
            let _ = self.refresh_session(&session).await;
        }
    }
}

/// Errors raised while refreshing the balance.
#[derive(Debug, thiserror::Error)]
pub enum BalanceError {
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Failed to resolve smart account: {0}")]
    Account(SmartAccountError),

    #[error("Failed to query balance: {0}")]
    Query(ProviderError),
}
