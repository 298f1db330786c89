// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local-key auth backend for development and headless deployments.
//!
//! Stands in for the embedded-wallet login popup: every successful `connect`
//! yields the same owner key, loaded once from configuration. The key is
//! never logged.

use std::sync::Arc;

use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use uuid::Uuid;

use super::{AuthCapability, AuthError, ConnectedUser, IdentityMethod, UserIdentity};
use crate::blockchain::NetworkConfig;

/// Auth capability backed by a locally held owner key.
pub struct LocalKeyAuth {
    signer: PrivateKeySigner,
    display_name: String,
    user_namespace: Uuid,
}

impl LocalKeyAuth {
    /// Create the backend from a hex private key (with or without `0x`).
    ///
    /// User ids are derived from `app_id` and the owner address, so the same
    /// key yields the same id for one app across restarts.
    pub fn from_hex(
        private_key_hex: &str,
        display_name: impl Into<String>,
        app_id: &str,
    ) -> Result<Self, AuthError> {
        let key_hex = private_key_hex
            .strip_prefix("0x")
            .unwrap_or(private_key_hex);

        let key_bytes = alloy::hex::decode(key_hex)
            .map_err(|e| AuthError::InvalidKey(e.to_string()))?;
        let signer = PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| AuthError::InvalidKey(e.to_string()))?;

        Ok(Self {
            signer,
            display_name: display_name.into(),
            user_namespace: Uuid::new_v5(&Uuid::NAMESPACE_URL, app_id.as_bytes()),
        })
    }
}

#[async_trait]
impl AuthCapability for LocalKeyAuth {
    async fn connect(
        &self,
        method: &IdentityMethod,
        network: &NetworkConfig,
    ) -> Result<ConnectedUser, AuthError> {
        let owner_address = self.signer.address();

        tracing::info!(
            method = %method,
            chain_id = network.chain_id,
            owner = %owner_address,
            "Local key login"
        );

        Ok(ConnectedUser {
            identity: UserIdentity {
                uuid: Uuid::new_v5(&self.user_namespace, owner_address.as_slice()).to_string(),
                name: self.display_name.clone(),
                method: method.clone(),
                owner_address,
            },
            owner: Arc::new(self.signer.clone()),
        })
    }

    async fn disconnect(&self) -> Result<(), AuthError> {
        tracing::info!("Local key logout");
        Ok(())
    }
}
