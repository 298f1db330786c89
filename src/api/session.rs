// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and logout endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::{IdentityMethod, UserIdentity},
    error::ApiError,
    state::AppState,
    view::Intent,
};

/// Request to start a session.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Identity method: "google", "twitter" or "" for the provider's picker
    #[serde(default)]
    pub method: IdentityMethod,
}

/// Session state after a login or logout.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResponse {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<UserIdentity>,
}

impl SessionResponse {
    fn from_state(state: &AppState) -> Self {
        let identity = state.sessions.identity();
        Self {
            logged_in: identity.is_some(),
            identity,
        }
    }
}

/// Log in through the auth provider.
///
/// Returns the existing session unchanged when already logged in.
#[utoipa::path(
    post,
    path = "/v1/session/login",
    tag = "Session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 502, description = "Auth provider rejected the login")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    state.dispatch(Intent::Login(request.method)).await?;
    Ok(Json(SessionResponse::from_state(&state)))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/v1/session/logout",
    tag = "Session",
    responses(
        (status = 200, description = "Logged out", body = SessionResponse),
        (status = 502, description = "Auth provider failed to disconnect")
    )
)]
pub async fn logout(State(state): State<AppState>) -> Result<Json<SessionResponse>, ApiError> {
    state.dispatch(Intent::Logout).await?;
    Ok(Json(SessionResponse::from_state(&state)))
}
