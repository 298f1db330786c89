// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The two fixed transaction templates.

use alloy::{
    primitives::{Address, U256},
    rpc::types::TransactionRequest,
};

use crate::blockchain::{encode_transfer, BURN_ADDRESS, USDB_TOKEN};

/// 0.001 ether in wei.
pub const NATIVE_TRANSFER_AMOUNT: U256 = U256::from_limbs([1_000_000_000_000_000, 0, 0, 0]);

/// Immutable description of a transaction to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionIntent {
    NativeTransfer {
        to: Address,
        amount: U256,
    },
    TokenTransfer {
        token: Address,
        to: Address,
        amount: U256,
    },
}

impl TransactionIntent {
    /// 0.001 native units to the burn address.
    pub fn native_transfer() -> Self {
        Self::NativeTransfer {
            to: BURN_ADDRESS,
            amount: NATIVE_TRANSFER_AMOUNT,
        }
    }

    /// `transfer(burn, 1 USDB)` on the USDB contract.
    pub fn token_transfer() -> Self {
        Self::TokenTransfer {
            token: USDB_TOKEN.address,
            to: BURN_ADDRESS,
            amount: USDB_TOKEN.one(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::NativeTransfer { .. } => "native_transfer",
            Self::TokenTransfer { .. } => "token_transfer",
        }
    }

    /// Build the call sent from the smart account `from`.
    pub fn to_request(&self, from: Address) -> TransactionRequest {
        match self {
            Self::NativeTransfer { to, amount } => TransactionRequest::default()
                .from(from)
                .to(*to)
                .value(*amount),
            Self::TokenTransfer { token, to, amount } => TransactionRequest::default()
                .from(from)
                .to(*token)
                .input(encode_transfer(*to, *amount).into()),
        }
    }
}
