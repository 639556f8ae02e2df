// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use frostgate_config::FrostgateConfig;
use frostgate_core::{FrostgateError, Warehouse};

use crate::handlers;
use crate::sse;

/// Snowflake object names the handlers interpolate into statements.
///
/// These come from operator configuration, never from request input, so
/// they are the only identifiers spliced into SQL text.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// Cortex agent name.
    pub name: String,
    /// Database holding the agent and document objects.
    pub database: String,
    /// Schema holding the agent and document objects.
    pub schema: String,
    /// Model for the summarize endpoint.
    pub summary_model: String,
    /// Document metadata table.
    pub metadata_table: String,
    /// Stage that receives uploads.
    pub stage: String,
}

impl AgentSettings {
    /// Resolve from config; the database and schema are required.
    pub fn from_config(config: &FrostgateConfig) -> Result<Self, FrostgateError> {
        let database = config
            .snowflake
            .database
            .clone()
            .ok_or_else(|| FrostgateError::Config("snowflake.database is required".into()))?;
        let schema = config
            .snowflake
            .schema
            .clone()
            .ok_or_else(|| FrostgateError::Config("snowflake.schema is required".into()))?;
        Ok(Self {
            name: config.agent.name.clone(),
            database,
            schema,
            summary_model: config.agent.summary_model.clone(),
            metadata_table: config.agent.metadata_table.clone(),
            stage: config.snowflake.stage.clone(),
        })
    }

    /// Fully-qualified agent name, `DB.SCHEMA.NAME`.
    pub fn fqn(&self) -> String {
        format!("{}.{}.{}", self.database, self.schema, self.name)
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Upstream warehouse, shared by every request.
    pub warehouse: Arc<dyn Warehouse>,
    /// Configured Snowflake object names.
    pub agent: Arc<AgentSettings>,
    /// Directory for transient upload temp files.
    pub upload_dir: PathBuf,
}

/// Build the gateway router with all routes and middleware.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/config", get(handlers::get_agent_config))
        .route("/api/chat", post(handlers::post_chat))
        .route("/api/chat/stream", post(sse::post_chat_stream))
        .route("/api/upload", post(handlers::post_upload))
        .route("/api/documents", get(handlers::get_documents))
        .route("/api/summarize", post(handlers::post_summarize))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the gateway HTTP server on the configured host and port.
pub async fn start_server(
    config: &frostgate_config::ServerConfig,
    state: GatewayState,
) -> Result<(), FrostgateError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FrostgateError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| FrostgateError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
