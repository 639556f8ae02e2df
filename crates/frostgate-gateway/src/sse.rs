// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events relay for POST /api/chat/stream.
//!
//! Frames are data-only (`data: <json>\n\n`) with a JSON `type` tag. A
//! request produces `thinking`, then one blocking agent call, then either
//! `response` + `done` or a single in-band `error` frame. Once headers are
//! out the status is committed as 200; failures can only be signalled
//! in-band.
//!
//! The relay task is spawned and runs to completion even if the client
//! disconnects; the upstream call is not aborted.

use std::convert::Infallible;

use axum::extract::{Json, State};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use frostgate_core::{ChatRequest, FrostgateError, StreamFrame};

use crate::handlers::{self, extract_agent_text, thread_coords, AGENT_SQL};
use crate::server::GatewayState;

/// POST /api/chat/stream
pub async fn post_chat_stream(
    State(state): State<GatewayState>,
    Json(body): Json<ChatRequest>,
) -> Response {
    // The blank-message check happens before headers, so it can still be
    // a real 400 instead of an in-band error frame.
    if body.message.trim().is_empty() {
        return handlers::fail(FrostgateError::Validation("Message is required".into()));
    }

    let (thread_id, message_id) = thread_coords(&body);
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(16);

    let warehouse = state.warehouse.clone();
    let agent_fqn = state.agent.fqn();
    let message = body.message.clone();

    tokio::spawn(async move {
        let _ = tx
            .send(Ok(frame_event(&StreamFrame::Thinking {
                content: "Processing your request...".into(),
            })))
            .await;

        match warehouse.execute(AGENT_SQL, &[agent_fqn, message]).await {
            Ok(rows) => {
                let cell = rows
                    .first()
                    .and_then(|row| row.get("RESPONSE"))
                    .cloned()
                    .unwrap_or(serde_json::Value::Null);
                let _ = tx
                    .send(Ok(frame_event(&StreamFrame::Response {
                        content: extract_agent_text(&cell),
                    })))
                    .await;
                let _ = tx
                    .send(Ok(frame_event(&StreamFrame::Done {
                        thread_id,
                        message_id,
                    })))
                    .await;
            }
            Err(e) => {
                debug!(error = %e, "agent call failed mid-stream");
                let _ = tx
                    .send(Ok(frame_event(&StreamFrame::Error {
                        content: e.to_string(),
                    })))
                    .await;
            }
        }
        // Dropping tx closes the stream.
    });

    Sse::new(ReceiverStream::new(rx)).into_response()
}

/// Serialize a frame into a data-only SSE event.
fn frame_event(frame: &StreamFrame) -> Event {
    match serde_json::to_string(frame) {
        Ok(json) => Event::default().data(json),
        Err(_) => {
            Event::default().data(r#"{"type":"error","content":"frame serialization failed"}"#)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use frostgate_core::StreamFrame;

    use crate::server::build_router;
    use crate::testutil::{row, test_state, FakeWarehouse};

    async fn stream_frames(
        warehouse: Arc<FakeWarehouse>,
        body: serde_json::Value,
    ) -> (StatusCode, Vec<StreamFrame>) {
        let router = build_router(test_state(warehouse, std::env::temp_dir()));
        let response = router
            .oneshot(
                Request::post("/api/chat/stream")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let text = String::from_utf8_lossy(&bytes).to_string();

        let frames = text
            .lines()
            .filter_map(|line| line.strip_prefix("data: "))
            .map(|payload| serde_json::from_str::<StreamFrame>(payload).expect("frame json"))
            .collect();
        (status, frames)
    }

    #[tokio::test]
    async fn blank_message_is_rejected_before_streaming() {
        let warehouse = Arc::new(FakeWarehouse::with_rows(vec![]));
        let router = build_router(test_state(warehouse, std::env::temp_dir()));
        let response = router
            .oneshot(
                Request::post("/api/chat/stream")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"message": ""}).to_string()))
                    .expect("request"),
            )
            .await
            .expect("infallible");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stream_emits_thinking_response_done_in_order() {
        let warehouse = Arc::new(FakeWarehouse::with_rows(vec![row(&[(
            "RESPONSE",
            json!(r#"{"content": "Here is your answer."}"#),
        )])]));
        let (status, frames) = stream_frames(
            warehouse,
            json!({"message": "hello", "thread_id": "t-9", "parent_message_id": 2}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(frames.len(), 3);
        assert!(matches!(
            &frames[0],
            StreamFrame::Thinking { content } if content == "Processing your request..."
        ));
        assert!(matches!(
            &frames[1],
            StreamFrame::Response { content } if content == "Here is your answer."
        ));
        assert!(matches!(
            &frames[2],
            StreamFrame::Done { thread_id, message_id }
                if thread_id == "t-9" && *message_id == 3
        ));
    }

    #[tokio::test]
    async fn stream_failure_yields_single_error_frame() {
        let warehouse = Arc::new(FakeWarehouse::failing("Cortex agent unavailable"));
        let (status, frames) = stream_frames(warehouse, json!({"message": "hello"})).await;

        // Headers were already committed as 200; the failure is in-band.
        assert_eq!(status, StatusCode::OK);
        assert_eq!(frames.len(), 2);
        assert!(matches!(&frames[0], StreamFrame::Thinking { .. }));
        assert!(matches!(
            &frames[1],
            StreamFrame::Error { content } if content.contains("Cortex agent unavailable")
        ));
    }

    #[tokio::test]
    async fn stream_accepts_and_ignores_orchestration_budget() {
        let warehouse = Arc::new(FakeWarehouse::with_rows(vec![row(&[(
            "RESPONSE",
            json!("ok"),
        )])]));
        let (status, frames) = stream_frames(
            warehouse,
            json!({"message": "hello", "orchestration_budget": {"tokens": 500}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(matches!(frames.last(), Some(StreamFrame::Done { .. })));
    }
}
