// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP API layer for frostgate.
//!
//! Exposes the chat, streaming chat (SSE), upload, document listing,
//! summarize, agent-config, and health endpoints over a shared
//! [`frostgate_core::Warehouse`].

pub mod handlers;
pub mod server;
pub mod sse;

#[cfg(test)]
pub(crate) mod testutil;

pub use server::{build_router, start_server, AgentSettings, GatewayState};
