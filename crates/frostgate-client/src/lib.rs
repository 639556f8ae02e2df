// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rust client for the frostgate gateway.
//!
//! [`FrostgateClient`] covers every HTTP endpoint; [`parse_frame_stream`]
//! turns any SSE byte stream into typed [`frostgate_core::StreamFrame`]s
//! and is usable independently of the client.

pub mod client;
pub mod sse;

pub use client::FrostgateClient;
pub use sse::parse_frame_stream;
