// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Credential presence is deliberately NOT checked here: the
//! default config must stay valid, and the Snowflake client constructor
//! reports missing credentials with better context.

use crate::diagnostic::ConfigError;
use crate::model::{AuthType, FrostgateConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &FrostgateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let addr = config.server.host.trim();
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{addr}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.server.upload_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.upload_dir must not be empty".to_string(),
        });
    }

    if config.snowflake.stage.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "snowflake.stage must not be empty".to_string(),
        });
    }

    if config.snowflake.statement_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "snowflake.statement_timeout_secs must be positive".to_string(),
        });
    }

    // Cross-field check: a configured credential must match the auth mode.
    match config.snowflake.auth_type {
        AuthType::Password => {
            if config.snowflake.password.is_none()
                && config.snowflake.private_key_path.is_some()
            {
                errors.push(ConfigError::Validation {
                    message: "snowflake.private_key_path is set but auth_type is `password`; \
                              set auth_type = \"keypair\" to use it"
                        .to_string(),
                });
            }
        }
        AuthType::Keypair => {
            if config.snowflake.private_key_path.is_none()
                && config.snowflake.password.is_some()
            {
                errors.push(ConfigError::Validation {
                    message: "snowflake.password is set but auth_type is `keypair`; \
                              set auth_type = \"password\" to use it"
                        .to_string(),
                });
            }
        }
    }

    if config.agent.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "agent.name must not be empty".to_string(),
        });
    }

    if config.agent.metadata_table.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "agent.metadata_table must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
