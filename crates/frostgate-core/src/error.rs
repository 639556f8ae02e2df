// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Frostgate gateway.

use thiserror::Error;

/// The primary error type used across the Frostgate workspace.
#[derive(Debug, Error)]
pub enum FrostgateError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Request validation errors (missing/blank required fields). Maps to HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// A referenced document does not exist or has not been processed yet. Maps to HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Warehouse errors (auth, SQL, network). The upstream message is carried
    /// verbatim and maps to HTTP 500.
    #[error("{message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Local filesystem failures while handling uploads.
    #[error("io error: {source}")]
    Io {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FrostgateError {
    /// Wraps an upstream failure, keeping the driver message untouched.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            source: None,
        }
    }
}

impl From<std::io::Error> for FrostgateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            source: Box::new(err),
        }
    }
}
