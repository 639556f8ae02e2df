// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared kernel for the frostgate workspace: the error type, the wire
//! types spoken over HTTP, and the [`Warehouse`] trait the gateway is
//! written against.

pub mod error;
pub mod traits;
pub mod types;

pub use error::FrostgateError;
pub use traits::Warehouse;
pub use types::{
    AgentDescription, ChatRequest, ChatResponse, DocumentRecord, ErrorBody, HealthReport, Row,
    StageAck, StreamFrame, SummarizeRequest, SummaryResponse, UploadReceipt,
};
