// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client mirroring every gateway endpoint.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use tracing::debug;

use frostgate_core::{
    AgentDescription, ChatRequest, ChatResponse, DocumentRecord, ErrorBody, FrostgateError,
    HealthReport, StreamFrame, SummarizeRequest, SummaryResponse, UploadReceipt,
};

use crate::sse;

/// Request timeout for non-streaming calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Client for the frostgate HTTP API.
#[derive(Debug, Clone)]
pub struct FrostgateClient {
    http: reqwest::Client,
    base_url: String,
}

impl FrostgateClient {
    /// Create a client for the gateway at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self, FrostgateError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FrostgateError::Upstream {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// GET /health. Parses the report for both healthy and unhealthy
    /// replies rather than treating 503 as a transport failure.
    pub async fn health(&self) -> Result<HealthReport, FrostgateError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(request_error)?;
        let status = response.status();
        let body = response.text().await.map_err(request_error)?;
        if status.is_success() || status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            serde_json::from_str(&body).map_err(|e| {
                FrostgateError::upstream(format!("failed to parse health report: {e}"))
            })
        } else {
            Err(backend_error(status, &body))
        }
    }

    /// GET /api/config.
    pub async fn agent_config(&self) -> Result<AgentDescription, FrostgateError> {
        let response = self
            .http
            .get(format!("{}/api/config", self.base_url))
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    /// POST /api/chat.
    ///
    /// Blank messages are rejected locally, mirroring the gateway's own
    /// check, so no request is sent for them.
    pub async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, FrostgateError> {
        if request.message.trim().is_empty() {
            return Err(FrostgateError::Validation("Message is required".into()));
        }
        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    /// POST /api/chat/stream.
    ///
    /// Every parsed frame is handed to `on_frame`; reading stops after a
    /// terminal (`done` or `complete`) frame regardless of stream state.
    pub async fn stream_message<F>(
        &self,
        request: &ChatRequest,
        mut on_frame: F,
    ) -> Result<(), FrostgateError>
    where
        F: FnMut(StreamFrame),
    {
        if request.message.trim().is_empty() {
            return Err(FrostgateError::Validation("Message is required".into()));
        }
        let response = self
            .http
            .post(format!("{}/api/chat/stream", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(backend_error(status, &body));
        }

        let mut frames = Box::pin(sse::parse_frame_stream(response.bytes_stream()));
        while let Some(frame) = frames.next().await {
            let frame = frame?;
            let terminal = frame.is_terminal();
            on_frame(frame);
            if terminal {
                debug!("terminal frame received, ending stream read");
                break;
            }
        }
        Ok(())
    }

    /// POST /api/upload with the file as the multipart `document` field.
    pub async fn upload_document(&self, path: &Path) -> Result<UploadReceipt, FrostgateError> {
        let bytes = tokio::fs::read(path).await.map_err(FrostgateError::from)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let form = multipart::Form::new()
            .part("document", multipart::Part::bytes(bytes).file_name(file_name));

        let response = self
            .http
            .post(format!("{}/api/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    /// GET /api/documents.
    pub async fn list_documents(&self) -> Result<Vec<DocumentRecord>, FrostgateError> {
        let response = self
            .http
            .get(format!("{}/api/documents", self.base_url))
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    /// POST /api/summarize.
    pub async fn summarize(
        &self,
        request: &SummarizeRequest,
    ) -> Result<SummaryResponse, FrostgateError> {
        let response = self
            .http
            .post(format!("{}/api/summarize", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }
}

fn request_error(e: reqwest::Error) -> FrostgateError {
    FrostgateError::Upstream {
        message: format!("request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

fn backend_error(status: reqwest::StatusCode, body: &str) -> FrostgateError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.to_string());
    FrostgateError::upstream(format!("backend error {status}: {message}"))
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FrostgateError> {
    let status = response.status();
    let body = response.text().await.map_err(request_error)?;
    if !status.is_success() {
        return Err(backend_error(status, &body));
    }
    serde_json::from_str(&body)
        .map_err(|e| FrostgateError::upstream(format!("failed to parse backend response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chat(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.into(),
            ..ChatRequest::default()
        }
    }

    #[tokio::test]
    async fn send_message_round_trips() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "Hello!",
                "thread_id": "t-1",
                "message_id": 1
            })))
            .mount(&server)
            .await;

        let client = FrostgateClient::new(server.uri()).unwrap();
        let reply = client.send_message(&chat("hi")).await.unwrap();
        assert_eq!(reply.response, "Hello!");
        assert_eq!(reply.thread_id, "t-1");
        assert_eq!(reply.message_id, 1);
    }

    #[tokio::test]
    async fn send_message_rejects_blank_locally() {
        // No server: the blank guard must fire before any request.
        let client = FrostgateClient::new("http://127.0.0.1:1").unwrap();
        let err = client.send_message(&chat("   ")).await.unwrap_err();
        assert!(matches!(err, FrostgateError::Validation(_)));
    }

    #[tokio::test]
    async fn backend_error_body_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "agent exploded"})),
            )
            .mount(&server)
            .await;

        let client = FrostgateClient::new(server.uri()).unwrap();
        let err = client.send_message(&chat("hi")).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("500"), "got: {msg}");
        assert!(msg.contains("agent exploded"), "got: {msg}");
    }

    #[tokio::test]
    async fn health_parses_unhealthy_503() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "status": "unhealthy",
                "error": "connection refused"
            })))
            .mount(&server)
            .await;

        let client = FrostgateClient::new(server.uri()).unwrap();
        let report = client.health().await.unwrap();
        assert_eq!(report.status, "unhealthy");
        assert_eq!(report.error.as_deref(), Some("connection refused"));
    }

    #[tokio::test]
    async fn list_documents_parses_camel_case() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "path": "report.pdf",
                "name": "report.pdf",
                "size": 52433,
                "lastModified": "2026-08-01 12:00:00",
                "pageCount": 12,
                "extractedAt": null,
                "textLength": null
            }])))
            .mount(&server)
            .await;

        let client = FrostgateClient::new(server.uri()).unwrap();
        let documents = client.list_documents().await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].size, 52433);
        assert!(documents[0].extracted_at.is_none());
    }

    #[tokio::test]
    async fn upload_document_sends_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "stagePath": "report.pdf",
                "originalName": "report.pdf",
                "size": 9,
                "message": "File uploaded successfully. Processing will begin automatically within 1 minute."
            })))
            .mount(&server)
            .await;

        let mut temp = tempfile::NamedTempFile::new().unwrap();
        temp.write_all(b"PDF bytes").unwrap();

        let client = FrostgateClient::new(server.uri()).unwrap();
        let receipt = client.upload_document(temp.path()).await.unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.stage_path, "report.pdf");
    }

    #[tokio::test]
    async fn summarize_round_trips() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/summarize"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"summary": "Short version."})),
            )
            .mount(&server)
            .await;

        let client = FrostgateClient::new(server.uri()).unwrap();
        let summary = client
            .summarize(&SummarizeRequest {
                content: Some("long text".into()),
                ..SummarizeRequest::default()
            })
            .await
            .unwrap();
        assert_eq!(summary.summary, "Short version.");
    }

    #[tokio::test]
    async fn stream_message_delivers_frames_and_stops_on_done() {
        let server = MockServer::start().await;
        let sse_body = concat!(
            "data: {\"type\":\"thinking\",\"content\":\"Processing your request...\"}\n\n",
            "data: {\"type\":\"response\",\"content\":\"Answer.\"}\n\n",
            "data: {\"type\":\"done\",\"thread_id\":\"t-1\",\"message_id\":1}\n\n",
            "data: {\"type\":\"response\",\"content\":\"should never be seen\"}\n\n",
        );
        Mock::given(method("POST"))
            .and(path("/api/chat/stream"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_body),
            )
            .mount(&server)
            .await;

        let client = FrostgateClient::new(server.uri()).unwrap();
        let mut seen = Vec::new();
        client
            .stream_message(&chat("hi"), |frame| seen.push(frame))
            .await
            .unwrap();

        assert_eq!(seen.len(), 3, "reading must stop at the done frame");
        assert!(matches!(&seen[0], StreamFrame::Thinking { .. }));
        assert!(matches!(&seen[1], StreamFrame::Response { content } if content == "Answer."));
        assert!(matches!(&seen[2], StreamFrame::Done { .. }));
    }

    #[tokio::test]
    async fn stream_message_surfaces_http_error_before_frames() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/stream"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "Message is required"})),
            )
            .mount(&server)
            .await;

        let client = FrostgateClient::new(server.uri()).unwrap();
        let err = client
            .stream_message(&chat("hi"), |_| {})
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Message is required"));
    }
}
