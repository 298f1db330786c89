// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, process::ExitCode, sync::Arc, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio_util::sync::CancellationToken;

use blast_smart_wallet::{
    api::router,
    auth::LocalKeyAuth,
    blockchain::{ChainClient, BLAST_SEPOLIA},
    config::AppConfig,
    logging,
    providers::ParticleAaClient,
    state::AppState,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(config.log_format) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), BoxError> {
    tracing::debug!(config = ?config, "Configuration loaded");

    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }

    let network = BLAST_SEPOLIA;
    let auth = LocalKeyAuth::from_hex(
        &config.owner_private_key,
        config.owner_display_name.clone(),
        &config.credentials.app_id,
    )?;
    let adapter = ParticleAaClient::new(&config.aa_rpc_url, &network, &config.credentials)?;
    let provider = ChainClient::new(network.clone(), &config.rpc_url)?;
    match provider.get_block_number().await {
        Ok(block) => tracing::info!(network = network.name, block, "Connected to chain RPC"),
        Err(e) => tracing::warn!(network = network.name, error = %e, "Chain RPC not reachable yet"),
    }

    let state = AppState::new(
        Arc::new(auth),
        Arc::new(adapter),
        Arc::new(provider),
        network,
    );

    let shutdown = CancellationToken::new();
    let refresher = state.refresher.spawn(shutdown.clone());
    let app = router(state);

    let handle = Handle::new();
    tokio::spawn(shutdown_signal(handle.clone(), shutdown.clone()));

    let addr = config.bind_addr;
    let served = match &config.tls {
        Some(tls) => {
            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;
            tracing::info!(address = %addr, "Listening on https://{addr} (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
        None => {
            tracing::info!(address = %addr, "Listening on http://{addr} (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
    };

    shutdown.cancel();
    if let Err(e) = refresher.await {
        tracing::warn!(error = %e, "Balance refresher task failed");
    }
    served?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(handle: Handle<SocketAddr>, shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
    shutdown.cancel();
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
