// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::account::SmartAccountAdapter;
use crate::auth::{AuthCapability, AuthError};
use crate::blockchain::{NetworkConfig, ProviderClient, TxReceipt};
use crate::notification::{Notification, Notifications};
use crate::session::{
    BalanceError, BalanceRefresher, BalanceSnapshot, SessionManager, TransactionError,
    TransactionExecutor,
};
use crate::view::{Intent, View};

/// Shared handles to the session components, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub refresher: Arc<BalanceRefresher>,
    pub executor: Arc<TransactionExecutor>,
    pub notifications: Notifications,
}

/// Result of a successfully dispatched intent.
#[derive(Debug, Clone)]
pub enum IntentOutcome {
    Session,
    Balance(BalanceSnapshot),
    Transaction(TxReceipt),
}

/// Failure of a dispatched intent.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Balance(#[from] BalanceError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

impl DispatchError {
    pub fn is_not_logged_in(&self) -> bool {
        matches!(
            self,
            Self::Balance(BalanceError::NotLoggedIn)
                | Self::Transaction(TransactionError::NotLoggedIn)
        )
    }
}

impl AppState {
    /// Wire the components over the given capabilities.
    pub fn new(
        auth: Arc<dyn AuthCapability>,
        adapter: Arc<dyn SmartAccountAdapter>,
        provider: Arc<dyn ProviderClient>,
        network: NetworkConfig,
    ) -> Self {
        let notifications = Notifications::default();
        let sessions = Arc::new(SessionManager::new(auth, network));
        let refresher = Arc::new(BalanceRefresher::new(
            sessions.clone(),
            adapter.clone(),
            provider.clone(),
            notifications.clone(),
        ));
        let executor = Arc::new(TransactionExecutor::new(
            sessions.clone(),
            adapter,
            provider,
            notifications.clone(),
        ));
        Self::from_parts(sessions, refresher, executor, notifications)
    }

    pub fn from_parts(
        sessions: Arc<SessionManager>,
        refresher: Arc<BalanceRefresher>,
        executor: Arc<TransactionExecutor>,
        notifications: Notifications,
    ) -> Self {
        Self {
            sessions,
            refresher,
            executor,
            notifications,
        }
    }

    pub fn network(&self) -> &NetworkConfig {
        self.sessions.network()
    }

    pub fn view(&self) -> View {
        View::render(
            self.sessions.identity().as_ref(),
            self.refresher.snapshot().as_ref(),
            self.network(),
        )
    }

    /// Route a user intent to the owning component.
    pub async fn dispatch(&self, intent: Intent) -> Result<IntentOutcome, DispatchError> {
        tracing::debug!(intent = ?intent, "Dispatching intent");

        match intent {
            Intent::Login(method) => {
                if let Err(e) = self.sessions.login(method).await {
                    self.notifications
                        .push(Notification::login_failure(&e.to_string()));
                    return Err(e.into());
                }
                Ok(IntentOutcome::Session)
            }
            Intent::Logout => {
                self.sessions.logout().await?;
                Ok(IntentOutcome::Session)
            }
            Intent::RefreshBalance => Ok(IntentOutcome::Balance(self.refresher.refresh().await?)),
            Intent::ExecuteNativeTransfer => Ok(IntentOutcome::Transaction(
                self.executor.execute_native_transfer().await?,
            )),
            Intent::ExecuteTokenTransfer => Ok(IntentOutcome::Transaction(
                self.executor.execute_token_transfer().await?,
            )),
        }
    }
}
