// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./frostgate.toml` > `~/.config/frostgate/frostgate.toml`
//! > `/etc/frostgate/frostgate.toml` with environment variable overrides via
//! `FROSTGATE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::FrostgateConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/frostgate/frostgate.toml` (system-wide)
/// 3. `~/.config/frostgate/frostgate.toml` (user XDG config)
/// 4. `./frostgate.toml` (local directory)
/// 5. `FROSTGATE_*` environment variables
pub fn load_config() -> Result<FrostgateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a specific TOML string only (no XDG lookup).
///
/// Used for testing and explicit config file specification.
pub fn load_config_from_str(toml_content: &str) -> Result<FrostgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FrostgateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FrostgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FrostgateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(FrostgateConfig::default()))
        .merge(Toml::file("/etc/frostgate/frostgate.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("frostgate/frostgate.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("frostgate.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. `FROSTGATE_SNOWFLAKE_PRIVATE_KEY_PATH`
/// must map to `snowflake.private_key_path`, not `snowflake.private.key.path`.
fn env_provider() -> Env {
    Env::prefixed("FROSTGATE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: FROSTGATE_SNOWFLAKE_ACCOUNT -> "snowflake_account"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("snowflake_", "snowflake.", 1)
            .replacen("agent_", "agent.", 1);
        mapped.into()
    })
}
