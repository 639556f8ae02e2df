// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The seam between HTTP handlers and the warehouse backend.

use std::path::Path;

use async_trait::async_trait;

use crate::error::FrostgateError;
use crate::types::{Row, StageAck};

/// A SQL warehouse that can run statements and ingest staged files.
///
/// The gateway depends on this trait rather than a concrete client so
/// handlers can be exercised against an in-memory fake.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Execute a statement with positional text bindings and return all rows.
    ///
    /// Bindings are substituted by the warehouse, not by string splicing,
    /// so user text never enters the statement itself.
    async fn execute(
        &self,
        statement: &str,
        bindings: &[String],
    ) -> Result<Vec<Row>, FrostgateError>;

    /// Upload a local file into the named stage path.
    async fn stage_upload(
        &self,
        local_path: &Path,
        stage_path: &str,
    ) -> Result<StageAck, FrostgateError>;

    /// Cheap connectivity check, used by the health endpoint.
    async fn probe(&self) -> Result<(), FrostgateError>;
}
