// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain RPC client for balance reads and receipt confirmation.

use std::time::Duration;

use alloy::{
    network::Ethereum,
    primitives::{Address, TxHash, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
};
use async_trait::async_trait;

use super::types::*;

/// Read side of the chain used by the session flow.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Balance of `address` in wei.
    async fn get_balance(&self, address: Address) -> Result<U256, ProviderError>;

    /// Block until the transaction is mined and return its receipt.
    ///
    /// No timeout is applied here; the call ends when the node reports a
    /// receipt or an RPC error.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ProviderError>;
}

/// HTTP provider type (with all fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Default interval between receipt polls.
const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// JSON-RPC client for an EVM network.
pub struct ChainClient {
    network: NetworkConfig,
    provider: HttpProvider,
    poll_interval: Duration,
}

impl ChainClient {
    /// Create a client for `network`, reaching it through `rpc_url`.
    pub fn new(network: NetworkConfig, rpc_url: &str) -> Result<Self, ProviderError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| ProviderError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url);

        Ok(Self {
            network,
            provider,
            poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
        })
    }

    /// Create a client for Blast Sepolia using its public RPC endpoint.
    pub fn blast_sepolia() -> Result<Self, ProviderError> {
        Self::new(BLAST_SEPOLIA, BLAST_SEPOLIA.rpc_url)
    }

    /// Override the receipt poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Get the current block number.
    pub async fn get_block_number(&self) -> Result<u64, ProviderError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ProviderError::Rpc(e.to_string()))
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }
}

#[async_trait]
impl ProviderClient for ChainClient {
    async fn get_balance(&self, address: Address) -> Result<U256, ProviderError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| ProviderError::Rpc(e.to_string()))
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ProviderError> {
        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| ProviderError::Rpc(format!("Failed to get receipt: {}", e)))?;

            if let Some(r) = receipt {
                return Ok(TxReceipt {
                    tx_hash,
                    block_number: r.block_number,
                    success: r.status(),
                });
            }

            tracing::debug!(tx_hash = %tx_hash, "Receipt not available yet");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Errors that can occur during chain reads.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("RPC error: {0}")]
    Rpc(String),
}
