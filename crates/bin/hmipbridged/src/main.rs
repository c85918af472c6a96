//! # hmipbridged — HomematicIP bridge daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise `tracing` with the configured filter
//! - Construct the HomematicIP client, the in-process accessory host and the
//!   bridge service
//! - Spawn the snapshot polling loop
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use hmipbridge_adapter_hmip_reqwest::HmipClient;
use hmipbridge_adapter_http_axum::router;
use hmipbridge_adapter_http_axum::state::AppState;
use hmipbridge_app::accessory_host::InMemoryAccessoryHost;
use hmipbridge_app::services::bridge_service::BridgeService;
use hmipbridge_app::sync_loop;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Vendor
    let client = HmipClient::new(&config.hmip).context("building HomematicIP client")?;

    // Host and bridge
    let host = Arc::new(InMemoryAccessoryHost::new(config.bridge.event_capacity));
    let bridge = Arc::new(BridgeService::new(Arc::clone(&host), client.clone()));

    let poller = tokio::spawn(sync_loop::run(
        client,
        Arc::clone(&bridge),
        config.poll_interval(),
    ));

    // HTTP
    let app = router::build(AppState::new(bridge, host));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(%bind_addr, "hmipbridged listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    poller.abort();
    tracing::info!("hmipbridged stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown requested");
}
