// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tracing subscriber setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

use crate::config::{LogFormat, DEFAULT_LOG_FILTER};

/// Install the global subscriber.
///
/// `RUST_LOG` overrides [`DEFAULT_LOG_FILTER`].
pub fn init(format: LogFormat) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;
    let subscriber = Registry::default().with(filter);

    match format {
        LogFormat::Json => {
            let layer = fmt::layer().json().with_current_span(true).with_target(true);
            tracing::subscriber::set_global_default(subscriber.with(layer))?;
        }
        LogFormat::Pretty => {
            let layer = fmt::layer().with_target(true).with_level(true);
            tracing::subscriber::set_global_default(subscriber.with(layer))?;
        }
    }
    Ok(())
}
