// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Login is delegated to an external embedded-wallet provider. The provider
//! authenticates the user with a social identity method and hands back the
//! user's profile together with a handle on the owner key that controls the
//! user's smart account.
//!
//! ## Identity methods
//!
//! The method is an open string set (`"google"`, `"twitter"`, or `""` for the
//! provider's generic picker). It is forwarded verbatim; nothing here
//! validates it.

pub mod error;
pub mod local;

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::account::OwnerSigner;
use crate::blockchain::NetworkConfig;

pub use error::AuthError;
pub use local::LocalKeyAuth;

/// Social or generic login mechanism requested by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct IdentityMethod(String);

impl IdentityMethod {
    pub fn new(method: impl Into<String>) -> Self {
        Self(method.into())
    }

    pub fn google() -> Self {
        Self::new("google")
    }

    pub fn twitter() -> Self {
        Self::new("twitter")
    }

    /// Provider-chosen method (empty string).
    pub fn other() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentityMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authenticated user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserIdentity {
    /// Provider-issued user id
    pub uuid: String,
    /// Display name
    pub name: String,
    /// Method the user logged in with
    pub method: IdentityMethod,
    /// Externally-owned address of the owner key
    #[schema(value_type = String)]
    pub owner_address: Address,
}

/// Successful `connect` result: the profile plus the owner key handle.
#[derive(Clone)]
pub struct ConnectedUser {
    pub identity: UserIdentity,
    pub owner: OwnerSigner,
}

impl std::fmt::Debug for ConnectedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectedUser")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// External auth capability.
#[async_trait]
pub trait AuthCapability: Send + Sync {
    /// Authenticate with `method` against `network`.
    async fn connect(
        &self,
        method: &IdentityMethod,
        network: &NetworkConfig,
    ) -> Result<ConnectedUser, AuthError>;

    /// End the provider session.
    async fn disconnect(&self) -> Result<(), AuthError>;
}
