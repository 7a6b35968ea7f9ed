//! Error types for scans and individual checks.

use std::time::Duration;

/// Errors that reject a scan before or while it runs.
///
/// Check failures are never represented here: they are contained in
/// [`crate::CheckOutcome::Failed`] and degrade to the check's default.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    #[error("Missing target parameter")]
    MissingTarget,

    #[error("Invalid URL or address format")]
    InvalidTarget,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScanError {
    /// Whether the caller is at fault (maps to a 400-class response).
    pub fn is_client_error(&self) -> bool {
        matches!(self, ScanError::MissingTarget | ScanError::InvalidTarget)
    }
}

/// Why a single check could not produce evidence.
#[derive(thiserror::Error, Debug)]
pub enum CheckError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    Payload(String),

    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("check aborted: {0}")]
    Aborted(String),
}

impl From<serde_json::Error> for CheckError {
    fn from(e: serde_json::Error) -> Self {
        CheckError::Payload(e.to_string())
    }
}
