// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Server-rendered page.
//!
//! Buttons post HTML forms here; each handler dispatches one intent and
//! redirects back to `/`. Failures surface as notifications on the next
//! render, so the handlers never return an error page.

use axum::{
    extract::{Form, State},
    response::{Html, Redirect},
};
use serde::Deserialize;

use crate::{auth::IdentityMethod, state::AppState, view::Intent};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub method: IdentityMethod,
}

/// Render the page, consuming pending notifications.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let notifications = state.notifications.drain();
    Html(state.view().to_html(&notifications))
}

async fn dispatch_and_return(state: &AppState, intent: Intent) -> Redirect {
    if let Err(e) = state.dispatch(intent).await {
        tracing::debug!(error = %e, "Intent failed");
    }
    Redirect::to("/")
}

pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Redirect {
    dispatch_and_return(&state, Intent::Login(form.method)).await
}

pub async fn logout(State(state): State<AppState>) -> Redirect {
    dispatch_and_return(&state, Intent::Logout).await
}

pub async fn refresh_balance(State(state): State<AppState>) -> Redirect {
    dispatch_and_return(&state, Intent::RefreshBalance).await
}

pub async fn execute_native_transfer(State(state): State<AppState>) -> Redirect {
    dispatch_and_return(&state, Intent::ExecuteNativeTransfer).await
}

pub async fn execute_token_transfer(State(state): State<AppState>) -> Redirect {
    dispatch_and_return(&state, Intent::ExecuteTokenTransfer).await
}
