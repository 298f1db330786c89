// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! View model and notification endpoints.

use axum::{extract::State, Json};

use crate::{notification::Notification, state::AppState, view::View};

/// Current page model.
#[utoipa::path(
    get,
    path = "/v1/view",
    tag = "View",
    responses(
        (status = 200, description = "LoggedOut or LoggedIn view", body = View)
    )
)]
pub async fn get_view(State(state): State<AppState>) -> Json<View> {
    Json(state.view())
}

/// Take the pending notifications, oldest first.
///
/// Notifications are transient; each one is returned once.
#[utoipa::path(
    get,
    path = "/v1/notifications",
    tag = "View",
    responses(
        (status = 200, description = "Pending notifications", body = Vec<Notification>)
    )
)]
pub async fn drain_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.notifications.drain())
}
