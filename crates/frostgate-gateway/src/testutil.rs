// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`Warehouse`] double for handler tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use frostgate_core::{FrostgateError, Row, StageAck, Warehouse};

use crate::server::{AgentSettings, GatewayState};

/// Fake warehouse that replays canned rows and records every statement.
pub(crate) struct FakeWarehouse {
    rows: Vec<Row>,
    fail_with: Option<String>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeWarehouse {
    pub(crate) fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            rows: Vec::new(),
            fail_with: Some(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Statements executed so far, with their bindings. Stage uploads are
    /// recorded as a `"PUT"` pseudo-statement.
    pub(crate) fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl Warehouse for FakeWarehouse {
    async fn execute(
        &self,
        statement: &str,
        bindings: &[String],
    ) -> Result<Vec<Row>, FrostgateError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((statement.to_string(), bindings.to_vec()));
        match &self.fail_with {
            Some(message) => Err(FrostgateError::upstream(message.clone())),
            None => Ok(self.rows.clone()),
        }
    }

    async fn stage_upload(
        &self,
        local_path: &Path,
        stage_path: &str,
    ) -> Result<StageAck, FrostgateError> {
        self.calls.lock().expect("calls lock").push((
            "PUT".to_string(),
            vec![local_path.display().to_string(), stage_path.to_string()],
        ));
        match &self.fail_with {
            Some(message) => Err(FrostgateError::upstream(message.clone())),
            None => Ok(StageAck {
                stage: "SFE_DOCUMENTS_STAGE".into(),
                path: stage_path.to_string(),
            }),
        }
    }

    async fn probe(&self) -> Result<(), FrostgateError> {
        match &self.fail_with {
            Some(message) => Err(FrostgateError::upstream(message.clone())),
            None => Ok(()),
        }
    }
}

/// Build one canned row from column/value pairs.
pub(crate) fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
    let mut row = Row::new();
    for (key, value) in pairs {
        row.insert((*key).to_string(), value.clone());
    }
    row
}

/// Gateway state wired to the fake warehouse and fixed agent settings.
pub(crate) fn test_state(warehouse: Arc<FakeWarehouse>, upload_dir: PathBuf) -> GatewayState {
    GatewayState {
        warehouse,
        agent: Arc::new(AgentSettings {
            name: "DoctorChris".into(),
            database: "SFE_DB".into(),
            schema: "DOCS".into(),
            summary_model: "mistral-large2".into(),
            metadata_table: "SFE_DOCUMENT_METADATA".into(),
            stage: "SFE_DOCUMENTS_STAGE".into(),
        }),
        upload_dir,
    }
}
