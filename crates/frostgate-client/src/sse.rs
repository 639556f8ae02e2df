// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE frame parser for the streaming chat endpoint.
//!
//! Converts any byte stream into typed [`StreamFrame`]s using the
//! `eventsource-stream` crate, which reassembles events split at
//! arbitrary byte boundaries, including mid-line. Frames are data-only;
//! the frame type lives in the JSON payload, not the SSE event name.

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};

use frostgate_core::{FrostgateError, StreamFrame};

/// Parse a byte stream into [`StreamFrame`]s.
///
/// Unparseable `data:` payloads are logged and skipped; transport errors
/// surface as [`FrostgateError::Upstream`]. Callers decide when to stop
/// reading (normally on a terminal frame).
pub fn parse_frame_stream<S, B, E>(
    byte_stream: S,
) -> impl Stream<Item = Result<StreamFrame, FrostgateError>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    byte_stream.eventsource().filter_map(|result| async move {
        match result {
            Ok(event) => match serde_json::from_str::<StreamFrame>(&event.data) {
                Ok(frame) => Some(Ok(frame)),
                Err(e) => {
                    tracing::debug!(payload = %event.data, error = %e, "skipping unparseable frame");
                    None
                }
            },
            Err(e) => Some(Err(FrostgateError::upstream(format!(
                "SSE stream error: {e}"
            )))),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    use futures::stream;

    /// Collect frames from raw SSE text delivered in the given chunks.
    async fn frames_from_chunks(chunks: Vec<&str>) -> Vec<StreamFrame> {
        let byte_chunks: Vec<Vec<u8>> = chunks.into_iter().map(|c| c.as_bytes().to_vec()).collect();
        let byte_stream = stream::iter(byte_chunks.into_iter().map(Ok::<_, Infallible>));
        parse_frame_stream(byte_stream)
            .map(|r| r.expect("no transport errors in test"))
            .collect()
            .await
    }

    const RELAY_OUTPUT: &str = concat!(
        "data: {\"type\":\"thinking\",\"content\":\"Processing your request...\"}\n\n",
        "data: {\"type\":\"response\",\"content\":\"Here you go.\"}\n\n",
        "data: {\"type\":\"done\",\"thread_id\":\"t-1\",\"message_id\":2}\n\n",
    );

    #[tokio::test]
    async fn parses_whole_relay_output() {
        let frames = frames_from_chunks(vec![RELAY_OUTPUT]).await;
        assert_eq!(frames.len(), 3);
        assert!(matches!(frames[0], StreamFrame::Thinking { .. }));
        assert!(matches!(frames[1], StreamFrame::Response { .. }));
        assert!(matches!(
            &frames[2],
            StreamFrame::Done { thread_id, message_id } if thread_id == "t-1" && *message_id == 2
        ));
    }

    #[tokio::test]
    async fn reassembles_frames_split_mid_line() {
        // Split inside the `data:` prefix, inside a JSON payload, and
        // between the trailing newlines.
        let frames = frames_from_chunks(vec![
            "da",
            "ta: {\"type\":\"thinking\",\"cont",
            "ent\":\"Processing your request...\"}\n",
            "\ndata: {\"type\":\"response\",\"content\":\"Here you go.\"}",
            "\n\ndata: {\"type\":\"done\",\"thread_id\":\"t-1\",\"message_id\":2}\n\n",
        ])
        .await;
        assert_eq!(frames.len(), 3);
        assert!(matches!(
            &frames[2],
            StreamFrame::Done { message_id, .. } if *message_id == 2
        ));
    }

    #[tokio::test]
    async fn byte_at_a_time_delivery() {
        let chunks: Vec<String> = RELAY_OUTPUT.chars().map(String::from).collect();
        let frames = frames_from_chunks(chunks.iter().map(String::as_str).collect()).await;
        assert_eq!(frames.len(), 3);
    }

    #[tokio::test]
    async fn unparseable_payloads_are_skipped() {
        let frames = frames_from_chunks(vec![
            "data: not json at all\n\n",
            "data: {\"type\":\"mystery_variant\"}\n\n",
            "data: {\"type\":\"response\",\"content\":\"ok\"}\n\n",
        ])
        .await;
        assert_eq!(frames.len(), 1);
        assert!(matches!(frames[0], StreamFrame::Response { .. }));
    }

    #[tokio::test]
    async fn error_frame_is_parsed_not_dropped() {
        let frames =
            frames_from_chunks(vec!["data: {\"type\":\"error\",\"content\":\"boom\"}\n\n"]).await;
        assert_eq!(frames.len(), 1);
        assert!(matches!(
            &frames[0],
            StreamFrame::Error { content } if content == "boom"
        ));
    }
}
