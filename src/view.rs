// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pure rendering of session state.
//!
//! A [`View`] is computed from the current identity and balance snapshot and
//! nothing else. Its only two states are `LoggedOut` and `LoggedIn`; the
//! identity's presence decides which one.

use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{IdentityMethod, UserIdentity};
use crate::blockchain::NetworkConfig;
use crate::notification::{Notification, NotificationKind};
use crate::session::BalanceSnapshot;

/// Shown in place of the balance until the first refresh completes.
pub const BALANCE_PENDING: &str = "...";

/// A user action the view can dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Login(IdentityMethod),
    Logout,
    RefreshBalance,
    ExecuteNativeTransfer,
    ExecuteTokenTransfer,
}

/// One login button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LoginOption {
    pub method: IdentityMethod,
    pub label: String,
}

/// Actions offered while logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewAction {
    ExecuteNativeTransfer,
    ExecuteTokenTransfer,
    Logout,
}

impl ViewAction {
    pub const ALL: [ViewAction; 3] = [
        ViewAction::ExecuteNativeTransfer,
        ViewAction::ExecuteTokenTransfer,
        ViewAction::Logout,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::ExecuteNativeTransfer => "Execute User Operation",
            Self::ExecuteTokenTransfer => "Execute Transaction ($USDB)",
            Self::Logout => "Logout",
        }
    }

    pub fn intent(self) -> Intent {
        match self {
            Self::ExecuteNativeTransfer => Intent::ExecuteNativeTransfer,
            Self::ExecuteTokenTransfer => Intent::ExecuteTokenTransfer,
            Self::Logout => Intent::Logout,
        }
    }

    /// Form target of the HTML button.
    fn form_action(self) -> &'static str {
        match self {
            Self::ExecuteNativeTransfer => "/ui/transactions/native",
            Self::ExecuteTokenTransfer => "/ui/transactions/token",
            Self::Logout => "/ui/logout",
        }
    }
}

/// The page model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum View {
    LoggedOut {
        login_options: Vec<LoginOption>,
    },
    LoggedIn {
        name: String,
        /// Balance in native units, absent until the first refresh
        #[serde(skip_serializing_if = "Option::is_none")]
        balance: Option<String>,
        /// `"<balance> ETH"`
        balance_display: String,
        actions: Vec<ViewAction>,
    },
}

impl View {
    pub fn login_options() -> Vec<LoginOption> {
        vec![
            LoginOption {
                method: IdentityMethod::google(),
                label: "Sign in with Google".to_string(),
            },
            LoginOption {
                method: IdentityMethod::twitter(),
                label: "Sign in with X".to_string(),
            },
            LoginOption {
                method: IdentityMethod::other(),
                label: "Other".to_string(),
            },
        ]
    }

    /// Render the page for the given session state.
    ///
    /// The snapshot is ignored while logged out.
    pub fn render(
        identity: Option<&UserIdentity>,
        snapshot: Option<&BalanceSnapshot>,
        network: &NetworkConfig,
    ) -> Self {
        let Some(identity) = identity else {
            return Self::LoggedOut {
                login_options: Self::login_options(),
            };
        };

        let balance = snapshot.map(|s| s.balance.clone());
        let balance_display = format!(
            "{} {}",
            balance.as_deref().unwrap_or(BALANCE_PENDING),
            network.native_symbol
        );

        Self::LoggedIn {
            name: identity.name.clone(),
            balance,
            balance_display,
            actions: ViewAction::ALL.to_vec(),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn { .. })
    }

    /// Standalone HTML page for this view with `notifications` on top.
    pub fn to_html(&self, notifications: &[Notification]) -> String {
        let mut body = String::new();

        for n in notifications {
            body.push_str(&notification_html(n));
        }

        match self {
            Self::LoggedOut { login_options } => {
                body.push_str("<div class=\"login-section\">\n");
                for option in login_options {
                    body.push_str(&format!(
                        "<form method=\"post\" action=\"/ui/login\">\
                         <input type=\"hidden\" name=\"method\" value=\"{}\">\
                         <button class=\"sign-button\" type=\"submit\">{}</button></form>\n",
                        escape_html(option.method.as_str()),
                        escape_html(&option.label),
                    ));
                }
                body.push_str("</div>\n");
            }
            Self::LoggedIn {
                name,
                balance_display,
                actions,
                ..
            } => {
                body.push_str("<div class=\"profile-card\">\n");
                body.push_str(&format!("<h2>{}</h2>\n", escape_html(name)));
                body.push_str("<div class=\"balance-section\">\n");
                body.push_str(&format!("<small>{}</small>\n", escape_html(balance_display)));
                body.push_str(
                    "<form method=\"post\" action=\"/ui/balance\">\
                     <button type=\"submit\">Refresh</button></form>\n",
                );
                for action in actions {
                    body.push_str(&format!(
                        "<form method=\"post\" action=\"{}\">\
                         <button type=\"submit\">{}</button></form>\n",
                        action.form_action(),
                        escape_html(action.label()),
                    ));
                }
                body.push_str("</div>\n</div>\n");
            }
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\">\
             <title>Blast Smart Wallet</title></head>\n\
             <body>\n<div class=\"App\">\n{body}</div>\n</body>\n</html>\n"
        )
    }
}

fn notification_html(n: &Notification) -> String {
    let class = match n.kind {
        NotificationKind::Success => "notification success",
        NotificationKind::Error => "notification error",
    };

    let description = match (&n.tx_hash, &n.link) {
        (Some(hash), Some(link)) if n.kind == NotificationKind::Success => format!(
            "Transaction Hash: <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            escape_html(link),
            escape_html(hash)
        ),
        (_, Some(link)) => format!(
            "{} <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">View on explorer</a>",
            escape_html(&n.description),
            escape_html(link)
        ),
        _ => escape_html(&n.description),
    };

    format!(
        "<div class=\"{class}\"><strong>{}</strong><div>{description}</div></div>\n",
        escape_html(&n.message)
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
