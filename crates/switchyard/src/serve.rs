// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Implementation of `switchyard serve`.

use std::sync::Arc;

use switchyard_config::SwitchyardConfig;
use switchyard_gateway::{GatewayState, ServerConfig};
use switchyard_router::Router;
use tracing::{info, warn};

use crate::error::CliError;
use crate::shutdown;

/// Build the router from `config` and serve the gateway until a shutdown signal.
pub async fn run_serve(config: SwitchyardConfig) -> Result<(), CliError> {
    let router = Router::from_config(&config)?;
    if router.registry().is_empty() {
        warn!("no policies configured; every routed request will fail with unknown_policy");
    }

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    let state = GatewayState::new(Arc::new(router));

    let cancel = shutdown::install_signal_handler();
    switchyard_gateway::start_server(&server_config, state, cancel).await?;

    info!("switchyard serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set. Output goes to stderr so that
/// `route` can print clean JSON on stdout.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("switchyard={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
