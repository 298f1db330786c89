// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

/// Authentication error type.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider refused the identity method or the user cancelled
    #[error("Login rejected: {0}")]
    Rejected(String),

    /// The provider could not be reached
    #[error("Auth provider unreachable: {0}")]
    Unreachable(String),

    /// Owner key material is unusable
    #[error("Invalid owner key: {0}")]
    InvalidKey(String),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Rejected(_) => "login_rejected",
            AuthError::Unreachable(_) => "auth_unreachable",
            AuthError::InvalidKey(_) => "invalid_owner_key",
        }
    }
}
