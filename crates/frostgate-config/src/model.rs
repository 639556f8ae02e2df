// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the frostgate gateway.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level frostgate configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values; required Snowflake
/// credentials are checked when the warehouse client is constructed, not here.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FrostgateConfig {
    /// HTTP listener and upload handling settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Snowflake account, credentials, and session settings.
    #[serde(default)]
    pub snowflake: SnowflakeConfig,

    /// Cortex agent and document pipeline settings.
    #[serde(default)]
    pub agent: AgentConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory for transient upload temp files.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upload_dir: default_upload_dir(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_upload_dir() -> String {
    ".uploads".to_string()
}

/// How the Snowflake client authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// Session login with `password`, established once at connect time.
    #[default]
    Password,
    /// Key-pair JWT minted from `private_key_path`.
    Keypair,
}

/// Snowflake account and credential configuration.
///
/// `account`, `user`, `database`, and `schema` are required for a working
/// deployment but modeled as `Option` so the default config still loads;
/// the client constructor reports what is missing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SnowflakeConfig {
    /// Account identifier, e.g. `myorg-myaccount`.
    #[serde(default)]
    pub account: Option<String>,

    /// Region segment appended to the account host, if the account needs one.
    #[serde(default)]
    pub region: Option<String>,

    /// Login name.
    #[serde(default)]
    pub user: Option<String>,

    /// Authentication method.
    #[serde(default)]
    pub auth_type: AuthType,

    /// Password, required when `auth_type = "password"`.
    #[serde(default)]
    pub password: Option<String>,

    /// Path to a PKCS#8 PEM private key, required when `auth_type = "keypair"`.
    #[serde(default)]
    pub private_key_path: Option<String>,

    /// Database holding the agent and document objects.
    #[serde(default)]
    pub database: Option<String>,

    /// Schema holding the agent and document objects.
    #[serde(default)]
    pub schema: Option<String>,

    /// Role to assume, if any.
    #[serde(default)]
    pub role: Option<String>,

    /// Warehouse to run statements on, if not the user default.
    #[serde(default)]
    pub warehouse: Option<String>,

    /// Internal stage that receives uploaded documents.
    #[serde(default = "default_stage")]
    pub stage: String,

    /// Server-side statement timeout in seconds.
    #[serde(default = "default_statement_timeout_secs")]
    pub statement_timeout_secs: u64,
}

impl Default for SnowflakeConfig {
    fn default() -> Self {
        Self {
            account: None,
            region: None,
            user: None,
            auth_type: AuthType::default(),
            password: None,
            private_key_path: None,
            database: None,
            schema: None,
            role: None,
            warehouse: None,
            stage: default_stage(),
            statement_timeout_secs: default_statement_timeout_secs(),
        }
    }
}

fn default_stage() -> String {
    "SFE_DOCUMENTS_STAGE".to_string()
}

fn default_statement_timeout_secs() -> u64 {
    300
}

/// Cortex agent and document pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Name of the Cortex agent, resolved inside `snowflake.database`/`schema`.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Model used by the summarize endpoint.
    #[serde(default = "default_summary_model")]
    pub summary_model: String,

    /// Table populated by the document extraction pipeline.
    #[serde(default = "default_metadata_table")]
    pub metadata_table: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            summary_model: default_summary_model(),
            metadata_table: default_metadata_table(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "DoctorChris".to_string()
}

fn default_summary_model() -> String {
    "mistral-large2".to_string()
}

fn default_metadata_table() -> String {
    "SFE_DOCUMENT_METADATA".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
