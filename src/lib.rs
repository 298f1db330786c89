// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blast Smart Wallet - session and sponsored-transaction service
//!
//! Social login through an embedded-wallet provider, the native balance of the
//! user's smart account, and two fixed gasless transactions on Blast Sepolia.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum) and the server-rendered page
//! - `auth` - Auth capability and the local-key backend
//! - `account` - Smart-account capability (address derivation, submission)
//! - `blockchain` - Blast Sepolia chain client, units and token ABI
//! - `providers` - Particle AA JSON-RPC adapter
//! - `session` - Session manager, balance refresher, transaction executor
//! - `view` - Pure view model over session state

pub mod account;
pub mod api;
pub mod auth;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod logging;
pub mod notification;
pub mod providers;
pub mod session;
pub mod state;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;
