// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session lifecycle: login, logout and the published identity.

use std::sync::Arc;

use alloy::primitives::Address;
use tokio::sync::{watch, Mutex, OnceCell};

use crate::account::{OwnerSigner, SmartAccountAdapter, SmartAccountError};
use crate::auth::{AuthCapability, AuthError, ConnectedUser, IdentityMethod, UserIdentity};
use crate::blockchain::NetworkConfig;

/// Value published to session subscribers. `None` means logged out.
pub type SessionState = Option<Arc<Session>>;

/// One authenticated session.
///
/// The smart-account address is derived on first use and lives only as long
/// as this session; a new login derives it again.
pub struct Session {
    identity: UserIdentity,
    owner: OwnerSigner,
    account: OnceCell<Address>,
}

impl Session {
    pub fn new(user: ConnectedUser) -> Self {
        Self {
            identity: user.identity,
            owner: user.owner,
            account: OnceCell::new(),
        }
    }

    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    pub fn owner(&self) -> &OwnerSigner {
        &self.owner
    }

    /// Smart-account address for this session's owner, resolved once.
    pub async fn account_address(
        &self,
        adapter: &dyn SmartAccountAdapter,
    ) -> Result<Address, SmartAccountError> {
        self.account
            .get_or_try_init(|| adapter.get_address(self.identity.owner_address))
            .await
            .copied()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .field("account", &self.account.get())
            .finish_non_exhaustive()
    }
}

/// Owns the authenticated identity and its connect/disconnect lifecycle.
///
/// The identity is only written here. Other components observe it through
/// [`SessionManager::subscribe`].
pub struct SessionManager {
    auth: Arc<dyn AuthCapability>,
    network: NetworkConfig,
    current: watch::Sender<SessionState>,
    // Serializes login/logout so two concurrent logins cannot both connect.
    transition: Mutex<()>,
}

impl SessionManager {
    pub fn new(auth: Arc<dyn AuthCapability>, network: NetworkConfig) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            auth,
            network,
            current,
            transition: Mutex::new(()),
        }
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Subscribe to session changes. The receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.current.subscribe()
    }

    pub fn current(&self) -> SessionState {
        self.current.borrow().clone()
    }

    pub fn identity(&self) -> Option<UserIdentity> {
        self.current
            .borrow()
            .as_ref()
            .map(|session| session.identity().clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Whether `session` is still the active session.
    pub fn is_current(&self, session: &Arc<Session>) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|active| Arc::ptr_eq(active, session))
    }

    /// Log in with `method`.
    ///
    /// Returns the existing session without contacting the provider when
    /// already logged in. On failure nothing is published.
    pub async fn login(&self, method: IdentityMethod) -> Result<Arc<Session>, AuthError> {
        let _guard = self.transition.lock().await;

        if let Some(existing) = self.current() {
            tracing::debug!(method = %method, "Login ignored, session already active");
            return Ok(existing);
        }

        let user = self.auth.connect(&method, &self.network).await.map_err(|e| {
            tracing::warn!(method = %method, code = e.error_code(), error = %e, "Login failed");
            e
        })?;

        let session = Arc::new(Session::new(user));
        tracing::info!(
            user = %session.identity().uuid,
            method = %method,
            "Session started"
        );
        self.current.send_replace(Some(Arc::clone(&session)));
        Ok(session)
    }

    /// Disconnect from the provider and clear the identity.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let _guard = self.transition.lock().await;

        self.auth.disconnect().await.map_err(|e| {
            tracing::warn!(error = %e, "Logout failed");
            e
        })?;

        if let Some(previous) = self.current.send_replace(None) {
            tracing::info!(user = %previous.identity().uuid, "Session ended");
        }
        Ok(())
    }
}
