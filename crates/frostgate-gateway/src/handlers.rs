// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles health, agent describe, chat, upload, document listing, and
//! summarization. Streaming chat lives in [`crate::sse`].

use std::path::Path;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use frostgate_core::{
    AgentDescription, ChatRequest, ChatResponse, DocumentRecord, ErrorBody, FrostgateError,
    HealthReport, Row, SummarizeRequest, SummaryResponse, UploadReceipt,
};

use crate::server::GatewayState;

/// Agent invocation; bindings are the fully-qualified agent name and the
/// user message.
pub(crate) const AGENT_SQL: &str = "SELECT SNOWFLAKE.CORTEX.AGENT(?, ?) AS RESPONSE";

/// Summarize inputs are truncated to this many characters before being
/// handed to the model.
const MAX_SUMMARY_INPUT_CHARS: usize = 30_000;

const DEFAULT_SUMMARY_PROMPT: &str = "Provide a concise executive summary of the following \
     document focusing on key findings, main points, and any recommended actions.";

/// Map a [`FrostgateError`] to its HTTP response.
pub(crate) fn fail(err: FrostgateError) -> Response {
    let status = match &err {
        FrostgateError::Validation(_) => StatusCode::BAD_REQUEST,
        FrostgateError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    match state.warehouse.probe().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthReport {
                status: "healthy".into(),
                snowflake: Some("connected".into()),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthReport {
                status: "unhealthy".into(),
                snowflake: None,
                error: Some(e.to_string()),
            }),
        )
            .into_response(),
    }
}

/// GET /api/config
///
/// Describes the configured agent. The identifier comes from operator
/// config, so it is interpolated rather than bound.
pub async fn get_agent_config(State(state): State<GatewayState>) -> Response {
    let statement = format!("DESCRIBE AGENT {}", state.agent.fqn());
    match state.warehouse.execute(&statement, &[]).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(AgentDescription {
                name: state.agent.name.clone(),
                database: state.agent.database.clone(),
                schema: state.agent.schema.clone(),
                description: rows,
            }),
        )
            .into_response(),
        Err(e) => fail(e),
    }
}

/// POST /api/chat
pub async fn post_chat(
    State(state): State<GatewayState>,
    Json(body): Json<ChatRequest>,
) -> Response {
    if body.message.trim().is_empty() {
        return fail(FrostgateError::Validation("Message is required".into()));
    }

    let bindings = [state.agent.fqn(), body.message.clone()];
    match state.warehouse.execute(AGENT_SQL, &bindings).await {
        Ok(rows) => {
            let response = rows
                .first()
                .and_then(|row| row.get("RESPONSE"))
                .cloned()
                .unwrap_or(Value::Null);
            let (thread_id, message_id) = thread_coords(&body);
            (
                StatusCode::OK,
                Json(ChatResponse {
                    response,
                    thread_id,
                    message_id,
                }),
            )
                .into_response()
        }
        Err(e) => fail(e),
    }
}

/// Thread coordinates echoed back to the caller: the thread id is opaque
/// and never validated, the message id is the parent's plus one
/// (saturating, since the counter is caller-controlled).
pub(crate) fn thread_coords(body: &ChatRequest) -> (String, u64) {
    let thread_id = body
        .thread_id
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    (
        thread_id,
        body.parent_message_id.unwrap_or(0).saturating_add(1),
    )
}

/// Extract displayable text from an agent RESPONSE cell.
///
/// The cell is usually a JSON string; when it parses as an object the
/// `content` (or `message`) field wins, otherwise the raw text is used.
pub(crate) fn extract_agent_text(cell: &Value) -> String {
    let raw = match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => map
            .get("content")
            .or_else(|| map.get("message"))
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or(raw),
        Ok(Value::String(s)) => s,
        _ => raw,
    }
}

/// POST /api/upload
///
/// Accepts a multipart `document` field, spools it to the upload dir,
/// PUTs it into the stage under its sanitized original name, and
/// refreshes the stage so the extraction pipeline notices it. The temp
/// file is removed only after the whole sequence succeeds.
pub async fn post_upload(
    State(state): State<GatewayState>,
    mut multipart: Multipart,
) -> Response {
    let mut document: Option<(String, axum::body::Bytes)> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("document") {
                    let original = field.file_name().unwrap_or("upload").to_string();
                    match field.bytes().await {
                        Ok(bytes) => {
                            document = Some((original, bytes));
                            break;
                        }
                        Err(e) => {
                            return fail(FrostgateError::Validation(format!(
                                "unreadable upload: {e}"
                            )));
                        }
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return fail(FrostgateError::Validation(format!(
                    "malformed multipart body: {e}"
                )));
            }
        }
    }

    let Some((original, bytes)) = document else {
        return fail(FrostgateError::Validation("No file uploaded".into()));
    };

    let safe_name = sanitize_filename(&original);
    let ext = Path::new(&safe_name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let temp_name = format!(
        "{}-{}{}",
        chrono::Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4(),
        ext
    );
    let temp_path = state.upload_dir.join(temp_name);

    if let Err(e) = tokio::fs::create_dir_all(&state.upload_dir).await {
        return fail(e.into());
    }
    if let Err(e) = tokio::fs::write(&temp_path, &bytes).await {
        return fail(e.into());
    }
    let size = bytes.len() as u64;

    let ack = match state.warehouse.stage_upload(&temp_path, &safe_name).await {
        Ok(ack) => ack,
        Err(e) => return fail(e),
    };

    let refresh = format!("ALTER STAGE {} REFRESH", state.agent.stage);
    if let Err(e) = state.warehouse.execute(&refresh, &[]).await {
        return fail(e);
    }

    if let Err(e) = tokio::fs::remove_file(&temp_path).await {
        tracing::warn!(path = %temp_path.display(), error = %e, "failed to remove upload temp file");
    }

    (
        StatusCode::OK,
        Json(UploadReceipt {
            success: true,
            stage_path: ack.path,
            original_name: safe_name,
            size,
            message: "File uploaded successfully. Processing will begin automatically within 1 minute."
                .into(),
        }),
    )
        .into_response()
}

/// Replace filesystem- and SQL-hostile characters before the name reaches
/// a PUT statement or the stage listing.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// GET /api/documents
pub async fn get_documents(State(state): State<GatewayState>) -> Response {
    let statement = format!(
        "SELECT FILE_PATH, FILE_NAME, FILE_SIZE, LAST_MODIFIED, PAGE_COUNT, \
         EXTRACTION_TIMESTAMP, LENGTH(EXTRACTED_TEXT) AS TEXT_LENGTH \
         FROM {} ORDER BY LAST_MODIFIED DESC",
        state.agent.metadata_table
    );
    match state.warehouse.execute(&statement, &[]).await {
        Ok(rows) => {
            let documents: Vec<DocumentRecord> = rows.iter().map(document_from_row).collect();
            (StatusCode::OK, Json(documents)).into_response()
        }
        Err(e) => fail(e),
    }
}

fn document_from_row(row: &Row) -> DocumentRecord {
    DocumentRecord {
        path: cell_str(row, "FILE_PATH").unwrap_or_default(),
        name: cell_str(row, "FILE_NAME").unwrap_or_default(),
        size: cell_i64(row, "FILE_SIZE").unwrap_or(0),
        last_modified: cell_str(row, "LAST_MODIFIED").unwrap_or_default(),
        page_count: cell_i64(row, "PAGE_COUNT"),
        extracted_at: cell_str(row, "EXTRACTION_TIMESTAMP"),
        text_length: cell_i64(row, "TEXT_LENGTH"),
    }
}

fn cell_str(row: &Row, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn cell_i64(row: &Row, key: &str) -> Option<i64> {
    match row.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// POST /api/summarize
///
/// Inline content wins; the metadata table is only consulted when no
/// content was supplied.
pub async fn post_summarize(
    State(state): State<GatewayState>,
    Json(body): Json<SummarizeRequest>,
) -> Response {
    let text = if let Some(content) = body.content.filter(|c| !c.trim().is_empty()) {
        content
    } else if let Some(stage_path) = body.stage_path.filter(|p| !p.trim().is_empty()) {
        let statement = format!(
            "SELECT EXTRACTED_TEXT FROM {} WHERE FILE_PATH = ?",
            state.agent.metadata_table
        );
        let rows = match state.warehouse.execute(&statement, &[stage_path]).await {
            Ok(rows) => rows,
            Err(e) => return fail(e),
        };
        let text = rows
            .first()
            .and_then(|row| row.get("EXTRACTED_TEXT"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if text.is_empty() {
            return fail(FrostgateError::NotFound(
                "Document not found or not yet processed. Wait ~1 minute after upload.".into(),
            ));
        }
        text
    } else {
        return fail(FrostgateError::Validation(
            "Either stagePath or content is required".into(),
        ));
    };

    let text: String = text.chars().take(MAX_SUMMARY_INPUT_CHARS).collect();
    let prompt = body
        .prompt
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SUMMARY_PROMPT.to_string());

    let statement = format!(
        "SELECT AI_COMPLETE('{}', CONCAT(?, '\n\nDocument:\n', ?)) AS SUMMARY",
        state.agent.summary_model
    );
    match state.warehouse.execute(&statement, &[prompt, text]).await {
        Ok(rows) => {
            let summary = rows
                .first()
                .and_then(|row| row.get("SUMMARY"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            (StatusCode::OK, Json(SummaryResponse { summary })).into_response()
        }
        Err(e) => fail(e),
    }
}
