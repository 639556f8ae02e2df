// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Snowflake SQL API adapter.
//!
//! Implements the [`frostgate_core::Warehouse`] trait over the SQL API v2:
//! bound-parameter statement execution, PUT-based stage upload, and a
//! `SELECT 1` probe, with key-pair JWT or password session authentication.

pub mod auth;
pub mod client;
pub mod types;

pub use client::SnowflakeClient;
