// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{IdentityMethod, UserIdentity},
    notification::{Notification, NotificationKind},
    session::{BalanceSnapshot, TxState},
    state::AppState,
    view::{LoginOption, View, ViewAction},
};

pub mod balance;
pub mod health;
pub mod session;
pub mod transactions;
pub mod ui;
pub mod view;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/view", get(view::get_view))
        .route("/notifications", get(view::drain_notifications))
        .route("/session/login", post(session::login))
        .route("/session/logout", post(session::logout))
        .route("/balance/refresh", post(balance::refresh_balance))
        .route(
            "/transactions/native",
            post(transactions::execute_native_transfer),
        )
        .route(
            "/transactions/token",
            post(transactions::execute_token_transfer),
        )
        .route("/transactions/state", get(transactions::transaction_state));

    let ui_routes = Router::new()
        .route("/", get(ui::index))
        .route("/ui/login", post(ui::login))
        .route("/ui/logout", post(ui::logout))
        .route("/ui/balance", post(ui::refresh_balance))
        .route("/ui/transactions/native", post(ui::execute_native_transfer))
        .route("/ui/transactions/token", post(ui::execute_token_transfer));

    Router::new()
        .merge(ui_routes)
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        view::get_view,
        view::drain_notifications,
        session::login,
        session::logout,
        balance::refresh_balance,
        transactions::execute_native_transfer,
        transactions::execute_token_transfer,
        transactions::transaction_state,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            View,
            LoginOption,
            ViewAction,
            IdentityMethod,
            UserIdentity,
            Notification,
            NotificationKind,
            BalanceSnapshot,
            TxState,
            session::LoginRequest,
            session::SessionResponse,
            transactions::TransactionResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "View", description = "Page model and notifications"),
        (name = "Session", description = "Social login and logout"),
        (name = "Balance", description = "Smart-account balance"),
        (name = "Transactions", description = "Sponsored transactions"),
        (name = "Health", description = "Service health")
    )
)]
struct ApiDoc;
