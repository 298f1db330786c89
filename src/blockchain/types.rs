// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use alloy::primitives::{address, Address, TxHash, U256};
use serde::Serialize;
use utoipa::ToSchema;

/// EVM network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// Chain ID
    pub chain_id: u64,
    /// Default RPC endpoint URL
    pub rpc_url: &'static str,
    /// Block explorer URL (no trailing slash)
    pub explorer_url: &'static str,
    /// Symbol shown next to native balances
    pub native_symbol: &'static str,
}

impl NetworkConfig {
    /// Explorer deep link for a transaction hash.
    ///
    /// Renders as `<explorer>/tx/<hash>`; users follow this link from the
    /// success notification, so the shape must stay stable.
    pub fn explorer_tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }
}

/// Blast Sepolia testnet configuration.
pub const BLAST_SEPOLIA: NetworkConfig = NetworkConfig {
    name: "Blast Sepolia",
    chain_id: 168_587_773,
    rpc_url: "https://sepolia.blast.io",
    explorer_url: "https://testnet.blastscan.io",
    native_symbol: "ETH",
};

/// Unspendable recipient used by the demonstration transfers.
pub const BURN_ADDRESS: Address = address!("000000000000000000000000000000000000dEaD");

/// ERC-20 token metadata.
#[derive(Debug, Clone)]
pub struct Erc20Token {
    pub decimals: u8,
    pub address: Address,
}

impl Erc20Token {
    /// One whole token in base units (`10^decimals`).
    pub fn one(&self) -> U256 {
        U256::from(10u64).pow(U256::from(self.decimals))
    }
}

/// USDB rebasing stablecoin on Blast Sepolia.
pub const USDB_TOKEN: Erc20Token = Erc20Token {
    decimals: 18,
    address: address!("83d0f53a26eb04082b0e187Df0d1f8c5a963e0C6"),
};

/// Transaction receipt after confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TxReceipt {
    /// Transaction hash
    #[schema(value_type = String)]
    pub tx_hash: TxHash,
    /// Block number where the transaction was included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Whether execution succeeded (false when reverted)
    pub success: bool,
}

/// Render a transaction hash the way explorers and users expect it
/// (`0x`-prefixed, lowercase, full length).
pub fn tx_hash_hex(tx_hash: &TxHash) -> String {
    format!("{tx_hash:?}")
}
