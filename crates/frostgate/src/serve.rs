// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `frostgate serve` command implementation.
//!
//! Connects to Snowflake eagerly, prepares the upload directory, and runs
//! the gateway HTTP server until the process is stopped.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};

use frostgate_config::FrostgateConfig;
use frostgate_core::FrostgateError;
use frostgate_gateway::server::{start_server, AgentSettings, GatewayState};
use frostgate_snowflake::SnowflakeClient;

/// Runs the `frostgate serve` command.
///
/// The Snowflake connection is established before the listener binds, so a
/// misconfigured deployment fails at startup rather than on first request.
pub async fn run_serve(config: FrostgateConfig) -> Result<(), FrostgateError> {
    init_tracing(&config.agent.log_level);

    info!("starting frostgate serve");

    let agent = AgentSettings::from_config(&config)?;
    info!(agent = %agent.fqn(), "agent resolved");

    let client = SnowflakeClient::connect(&config.snowflake).await.map_err(|e| {
        error!(error = %e, "failed to connect to Snowflake");
        eprintln!(
            "error: Snowflake connection failed. Check snowflake.account, \
             snowflake.user, and the configured credentials."
        );
        e
    })?;

    let upload_dir = PathBuf::from(&config.server.upload_dir);
    tokio::fs::create_dir_all(&upload_dir)
        .await
        .map_err(FrostgateError::from)?;
    info!(dir = %upload_dir.display(), "upload directory ready");

    let state = GatewayState {
        warehouse: Arc::new(client),
        agent: Arc::new(agent),
        upload_dir,
    };

    start_server(&config.server, state).await?;

    info!("frostgate serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("frostgate={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
