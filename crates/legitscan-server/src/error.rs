//! API error type and its JSON rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use legitscan::ScanError;
use serde_json::json;

/// Generic message returned with every 500.
pub const INTERNAL_MESSAGE: &str = "An unexpected error occurred while analyzing the target";

/// Every non-200 outcome of the scan endpoint.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Malformed body or target. Rendered as `{ "error": msg }`.
    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    NotFound,

    /// Rendered as `{ "error", "message" }`; `detail` only in development mode.
    #[error("Failed to analyze project")]
    Internal {
        message: String,
        detail: Option<String>,
    },
}

impl ApiError {
    /// Map a scan error, exposing internal detail only when `development_mode`.
    pub fn from_scan(err: ScanError, development_mode: bool) -> Self {
        match err {
            ScanError::MissingTarget | ScanError::InvalidTarget => {
                ApiError::BadRequest(err.to_string())
            }
            ScanError::Internal(detail) => ApiError::Internal {
                message: INTERNAL_MESSAGE.to_string(),
                detail: development_mode.then_some(detail),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Internal { message, detail } => {
                tracing::error!(%message, detail = detail.as_deref().unwrap_or(""), "scan failed");
                let mut body = json!({ "error": self.to_string(), "message": message });
                if let Some(detail) = detail {
                    body["detail"] = json!(detail);
                }
                body
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
