// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction execution through the smart account.
//!
//! Each invocation walks `Idle → Submitting → AwaitingConfirmation →
//! Succeeded | Failed`. Terminal states are never retried; the next user
//! action starts over. Both terminal states produce a notification.

use std::sync::Arc;

use alloy::primitives::TxHash;
use serde::Serialize;
use tokio::sync::watch;
use utoipa::ToSchema;

use super::intent::TransactionIntent;
use super::manager::{Session, SessionManager};
use crate::account::{SendMode, SmartAccountAdapter, SmartAccountError};
use crate::blockchain::{tx_hash_hex, NetworkConfig, ProviderClient, ProviderError, TxReceipt};
use crate::notification::{Notification, Notifications};

/// Progress of the most recent transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TxState {
    Idle,
    Submitting {
        intent: String,
    },
    AwaitingConfirmation {
        intent: String,
        tx_hash: String,
    },
    Succeeded {
        intent: String,
        tx_hash: String,
        explorer_url: String,
    },
    Failed {
        intent: String,
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        tx_hash: Option<String>,
    },
}

/// Builds, submits and confirms the fixed transaction templates.
pub struct TransactionExecutor {
    sessions: Arc<SessionManager>,
    adapter: Arc<dyn SmartAccountAdapter>,
    provider: Arc<dyn ProviderClient>,
    mode: SendMode,
    state: watch::Sender<TxState>,
    notifications: Notifications,
}

impl TransactionExecutor {
    /// Create an executor submitting in gasless mode.
    pub fn new(
        sessions: Arc<SessionManager>,
        adapter: Arc<dyn SmartAccountAdapter>,
        provider: Arc<dyn ProviderClient>,
        notifications: Notifications,
    ) -> Self {
        let (state, _) = watch::channel(TxState::Idle);
        Self {
            sessions,
            adapter,
            provider,
            mode: SendMode::Gasless,
            state,
            notifications,
        }
    }

    pub fn with_mode(mut self, mode: SendMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn state(&self) -> TxState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TxState> {
        self.state.subscribe()
    }

    fn network(&self) -> &NetworkConfig {
        self.sessions.network()
    }

    /// Send 0.001 native units to the burn address.
    pub async fn execute_native_transfer(&self) -> Result<TxReceipt, TransactionError> {
        self.execute(TransactionIntent::native_transfer()).await
    }

    /// Send one USDB to the burn address.
    pub async fn execute_token_transfer(&self) -> Result<TxReceipt, TransactionError> {
        self.execute(TransactionIntent::token_transfer()).await
    }

    /// Submit `intent` from the active session and wait for its receipt.
    pub async fn execute(&self, intent: TransactionIntent) -> Result<TxReceipt, TransactionError> {
        let session = self
            .sessions
            .current()
            .ok_or(TransactionError::NotLoggedIn)?;
        let kind = intent.kind();

        self.state.send_replace(TxState::Submitting {
            intent: kind.to_string(),
        });

        match self.submit_and_confirm(&session, &intent).await {
            Ok(receipt) => {
                let tx_hash = tx_hash_hex(&receipt.tx_hash);
                let explorer_url = self.network().explorer_tx_url(&tx_hash);
                tracing::info!(
                    intent = kind,
                    tx_hash = %tx_hash,
                    block = ?receipt.block_number,
                    "Transaction confirmed"
                );

                self.notifications
                    .push(Notification::transaction_success(self.network(), &tx_hash));
                self.state.send_replace(TxState::Succeeded {
                    intent: kind.to_string(),
                    tx_hash,
                    explorer_url,
                });
                Ok(receipt)
            }
            Err(e) => {
                let tx_hash = e.tx_hash().map(|h| tx_hash_hex(&h));
                tracing::warn!(intent = kind, tx_hash = ?tx_hash, error = %e, "Transaction failed");

                self.notifications.push(Notification::transaction_failure(
                    self.network(),
                    &e.to_string(),
                    tx_hash.as_deref(),
                ));
                self.state.send_replace(TxState::Failed {
                    intent: kind.to_string(),
                    reason: e.to_string(),
                    tx_hash,
                });
                Err(e)
            }
        }
    }

    async fn submit_and_confirm(
        &self,
        session: &Session,
        intent: &TransactionIntent,
    ) -> Result<TxReceipt, TransactionError> {
        let account = session
            .account_address(self.adapter.as_ref())
            .await
            .map_err(TransactionError::Account)?;

        let tx_hash = self
            .adapter
            .send_transaction(session.owner(), intent.to_request(account), self.mode)
            .await
            .map_err(TransactionError::Submission)?;

        self.state.send_replace(TxState::AwaitingConfirmation {
            intent: intent.kind().to_string(),
            tx_hash: tx_hash_hex(&tx_hash),
        });

        let receipt = self
            .provider
            .wait_for_receipt(tx_hash)
            .await
            .map_err(|source| TransactionError::Confirmation { tx_hash, source })?;

        if !receipt.success {
            return Err(TransactionError::Reverted(tx_hash));
        }
        Ok(receipt)
    }
}

/// Errors raised while executing a transaction.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Failed to resolve smart account: {0}")]
    Account(SmartAccountError),

    #[error("Submission failed: {0}")]
    Submission(SmartAccountError),

    #[error("Confirmation failed for {tx_hash:?}: {source}")]
    Confirmation {
        tx_hash: TxHash,
        source: ProviderError,
    },

    #[error("Transaction {0:?} reverted")]
    Reverted(TxHash),
}

impl TransactionError {
    /// Hash of the submitted transaction, if submission got that far.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::Confirmation { tx_hash, .. } | Self::Reverted(tx_hash) => Some(*tx_hash),
            _ => None,
        }
    }
}
