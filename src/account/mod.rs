// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Smart Account Abstraction
//!
//! The user's owner key (held by the auth provider) controls a deployable
//! smart-account contract. Transactions are not signed as plain EOA
//! transactions: they are wrapped into user operations, sponsored by a
//! paymaster when running in gasless mode, and relayed by a bundler.
//!
//! Everything behind [`SmartAccountAdapter`] is an external capability; the
//! session flow only needs the derived account address and a way to submit.

use std::sync::Arc;

use alloy::{
    primitives::{Address, TxHash},
    rpc::types::TransactionRequest,
    signers::Signer,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Owner key handle, shared between the session and the adapter.
pub type OwnerSigner = Arc<dyn Signer + Send + Sync>;

/// Who pays for a submitted user operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendMode {
    /// Fees sponsored by the verifying paymaster.
    Gasless,
    /// Fees deducted from the smart account's native balance.
    Native,
}

/// Smart-account contract implementation and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountContract {
    pub name: &'static str,
    pub version: &'static str,
}

/// Biconomy v2 account, the contract deployed for every user.
pub const BICONOMY_V2: AccountContract = AccountContract {
    name: "BICONOMY",
    version: "2.0.0",
};

/// Account-abstraction capability.
#[async_trait]
pub trait SmartAccountAdapter: Send + Sync {
    /// Counterfactual smart-account address controlled by `owner`.
    async fn get_address(&self, owner: Address) -> Result<Address, SmartAccountError>;

    /// Wrap `request` into a user operation signed by `owner` and submit it.
    ///
    /// Returns the hash of the transaction that carries the operation.
    async fn send_transaction(
        &self,
        owner: &OwnerSigner,
        request: TransactionRequest,
        mode: SendMode,
    ) -> Result<TxHash, SmartAccountError>;
}

/// Errors raised by smart-account operations.
#[derive(Debug, thiserror::Error)]
pub enum SmartAccountError {
    #[error("Smart account request failed: {0}")]
    Request(String),

    #[error("Smart account RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Smart account response was invalid: {0}")]
    InvalidResponse(String),

    #[error("Failed to sign user operation: {0}")]
    Signing(String),

    #[error("No {0:?} fee quote available for this operation")]
    QuoteUnavailable(SendMode),
}
