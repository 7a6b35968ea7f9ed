// Copyright 2026 Cortex Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP surface for the legitscan evidence aggregator.
//!
//! Exposes one scan endpoint (`POST /api/scan`, also mounted at `/`) with
//! permissive CORS, plus a health probe. The binary in `main.rs` wires it to
//! configuration, logging and a one-shot `scan` command.

pub mod error;
pub mod logging;
pub mod rest;

pub use error::ApiError;
pub use rest::{router, SharedState};
