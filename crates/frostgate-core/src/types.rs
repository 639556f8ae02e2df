// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types shared by the gateway and the client library.
//!
//! These mirror the JSON surface of the HTTP API: chat requests and
//! responses, SSE stream frames, document records, and upload receipts.

use serde::{Deserialize, Serialize};

/// A single result row from the warehouse, keyed by uppercase column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Acknowledgement returned by a stage upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageAck {
    /// Name of the stage the file landed in.
    pub stage: String,
    /// Path of the file within the stage.
    pub path: String,
}

/// A frame on the streaming chat channel.
///
/// The relay emits `thinking`, `response`, `done`, and `error`; the richer
/// variants exist because upstream agent payloads use them and the client
/// parser must understand every frame it may receive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamFrame {
    /// The relay has accepted the request and is waiting on the agent.
    Thinking { content: String },
    /// Free-form progress note.
    Status { content: String },
    /// Incremental reasoning text.
    ThinkingDelta { content: String },
    /// A complete text block.
    Text { content: String },
    /// Incremental response text.
    TextDelta { content: String },
    /// The full agent response for this turn.
    Response { content: String },
    /// Structured side-channel data attached to the turn.
    Metadata {
        #[serde(default)]
        content: serde_json::Value,
    },
    /// The turn is complete (no trailing payload).
    Complete,
    /// Terminal frame carrying the thread coordinates for the next turn.
    Done { thread_id: String, message_id: u64 },
    /// In-band failure; no HTTP status can be changed once streaming started.
    Error { content: String },
}

impl StreamFrame {
    /// True for frames that end the client read loop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamFrame::Done { .. } | StreamFrame::Complete)
    }
}

/// Request body for `POST /api/chat` and `POST /api/chat/stream`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User message text.
    pub message: String,
    /// Opaque thread identifier; echoed back, never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Opaque message counter; echoed back incremented.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<u64>,
    /// Accepted on the streaming endpoint and ignored, as in the source system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orchestration_budget: Option<serde_json::Value>,
}

/// Response body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Raw agent response cell; a JSON string or object depending on the agent.
    pub response: serde_json::Value,
    /// Echoed thread id, or a freshly generated UUID when absent.
    pub thread_id: String,
    /// `parent_message_id + 1` (1 for a fresh thread).
    pub message_id: u64,
}

/// Request body for `POST /api/summarize`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    /// Stage path of a processed document to summarize.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_path: Option<String>,
    /// Custom summarization prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Inline text to summarize instead of a staged document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Response body for `POST /api/summarize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// One processed document as reported by the metadata table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Stage-relative file path.
    pub path: String,
    /// Original file name.
    pub name: String,
    /// File size in bytes.
    pub size: i64,
    /// Last-modified timestamp, as the warehouse reports it.
    pub last_modified: String,
    /// Page count from the extraction pipeline, if known.
    pub page_count: Option<i64>,
    /// Extraction timestamp, if the document has been processed.
    pub extracted_at: Option<String>,
    /// Length of the extracted text, if processed.
    pub text_length: Option<i64>,
}

/// Response body for `POST /api/upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub success: bool,
    /// Path of the file within the stage.
    pub stage_path: String,
    /// Name the file was uploaded under.
    pub original_name: String,
    /// Uploaded byte count.
    pub size: u64,
    /// Human-readable status note.
    pub message: String,
}

/// Response body for `GET /api/config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDescription {
    /// Agent name.
    pub name: String,
    /// Database the agent lives in.
    pub database: String,
    /// Schema the agent lives in.
    pub schema: String,
    /// Raw `DESCRIBE AGENT` rows.
    pub description: Vec<Row>,
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snowflake: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error response body used by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
