// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration module for Blast Sepolia.
//!
//! This module provides functionality for:
//! - Querying native balances
//! - Waiting for transaction receipts
//! - ERC-20 `transfer` call encoding
//! - Ether-style unit formatting

pub mod client;
pub mod erc20;
pub mod types;
pub mod units;

pub use client::{ChainClient, ProviderClient, ProviderError};
pub use erc20::encode_transfer;
pub use types::*;
pub use units::{format_ether, format_units};
