//! Transport-level failures and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// A request that could not be decoded or a response that could not be encoded.
///
/// Decode failures are the client's fault and are answered before any domain
/// logic runs. Encode failures are internal faults.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("bad number in request: {0}")]
    InvalidInput(String),
    #[error("malformed request: {0}")]
    Decode(String),
    #[error("failed to encode response: {0}")]
    Encode(String),
}

impl TransportError {
    pub fn status(&self) -> StatusCode {
        match self {
            TransportError::InvalidInput(_) | TransportError::Decode(_) => StatusCode::BAD_REQUEST,
            TransportError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TransportError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Transport failure");
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }
        (status, axum::Json(json!({ "error": self.to_string() }))).into_response()
    }
}
