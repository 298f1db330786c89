// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Smart-account balance endpoint.

use axum::{extract::State, Json};

use crate::{error::ApiError, session::BalanceSnapshot, state::AppState, state::DispatchError};

/// Re-read the native balance of the session's smart account.
///
/// On failure the previous snapshot is kept.
#[utoipa::path(
    post,
    path = "/v1/balance/refresh",
    tag = "Balance",
    responses(
        (status = 200, description = "Balance refreshed", body = BalanceSnapshot),
        (status = 409, description = "Not logged in"),
        (status = 502, description = "Smart account or chain RPC unavailable")
    )
)]
pub async fn refresh_balance(
    State(state): State<AppState>,
) -> Result<Json<BalanceSnapshot>, ApiError> {
    let snapshot = state
        .refresher
        .refresh()
        .await
        .map_err(DispatchError::from)?;
    Ok(Json(snapshot))
}
