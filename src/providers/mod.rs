// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Third-party service integrations.

pub mod particle;

pub use particle::{ParticleAaClient, DEFAULT_AA_RPC_URL};
