// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Endpoints for the two fixed transactions.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    blockchain::{tx_hash_hex, TxReceipt},
    error::ApiError,
    session::{TransactionError, TxState},
    state::{AppState, DispatchError},
};

/// A confirmed transaction.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionResponse {
    /// Transaction hash (0x-prefixed)
    pub tx_hash: String,
    /// Block the transaction was included in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Block explorer link
    pub explorer_url: String,
}

fn confirmed(
    state: &AppState,
    result: Result<TxReceipt, TransactionError>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let receipt = result.map_err(DispatchError::from)?;
    let tx_hash = tx_hash_hex(&receipt.tx_hash);
    Ok(Json(TransactionResponse {
        explorer_url: state.network().explorer_tx_url(&tx_hash),
        tx_hash,
        block_number: receipt.block_number,
    }))
}

/// Send 0.001 ETH to the burn address, gas sponsored.
///
/// Blocks until the transaction is mined.
#[utoipa::path(
    post,
    path = "/v1/transactions/native",
    tag = "Transactions",
    responses(
        (status = 200, description = "Transaction confirmed", body = TransactionResponse),
        (status = 409, description = "Not logged in"),
        (status = 502, description = "Submission failed or transaction reverted")
    )
)]
pub async fn execute_native_transfer(
    State(state): State<AppState>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let result = state.executor.execute_native_transfer().await;
    confirmed(&state, result)
}

/// Transfer 1 USDB to the burn address, gas sponsored.
#[utoipa::path(
    post,
    path = "/v1/transactions/token",
    tag = "Transactions",
    responses(
        (status = 200, description = "Transaction confirmed", body = TransactionResponse),
        (status = 409, description = "Not logged in"),
        (status = 502, description = "Submission failed or transaction reverted")
    )
)]
pub async fn execute_token_transfer(
    State(state): State<AppState>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let result = state.executor.execute_token_transfer().await;
    confirmed(&state, result)
}

/// State of the most recent transaction.
#[utoipa::path(
    get,
    path = "/v1/transactions/state",
    tag = "Transactions",
    responses(
        (status = 200, description = "Executor state", body = TxState)
    )
)]
pub async fn transaction_state(State(state): State<AppState>) -> Json<TxState> {
    Json(state.executor.state())
}
