// Copyright 2026 Cortex Contributors
// SPDX-License-Identifier: Apache-2.0

//! legitscan: best-effort evidence aggregation for project legitimacy.
//!
//! A scan takes one target (a website URL or an EVM contract address), runs
//! every applicable [`checks::Check`] concurrently against third-party
//! services, and folds whatever settles into a fixed-shape [`ScanReport`].
//! Individual checks may fail, time out, or be skipped for lack of a
//! credential; the scan itself only fails on an invalid target.

pub mod aggregator;
pub mod checks;
pub mod config;
pub mod error;
pub mod http_client;
pub mod report;
pub mod rules;
pub mod target;

pub use aggregator::{Aggregator, Scan};
pub use checks::{CheckKind, CheckOutcome, CheckResult, Evidence};
pub use config::{Credentials, Endpoints, ScannerConfig};
pub use error::{CheckError, ScanError};
pub use report::{AiScore, ScanReport};
pub use target::{Target, TargetKind};
