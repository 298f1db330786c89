// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session and transaction-submission flow.
//!
//! - `manager` - login/logout, owns the published identity
//! - `balance` - edge-triggered balance refresh
//! - `intent` - the fixed transaction templates
//! - `executor` - submit, confirm, notify

pub mod balance;
pub mod executor;
pub mod intent;
pub mod manager;

pub use balance::{BalanceError, BalanceRefresher, BalanceSnapshot};
pub use executor::{TransactionError, TransactionExecutor, TxState};
pub use intent::TransactionIntent;
pub use manager::{Session, SessionManager, SessionState};
