//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

/// Error returned by a handler, rendered as `{"detail": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ServerError {
    /// Unknown record or game.
    #[display("{}", _0)]
    NotFound(String),
    /// Malformed or illegal request.
    #[display("{}", _0)]
    BadRequest(String),
    /// Filesystem or state failure.
    #[display("{}", _0)]
    Internal(String),
}

impl std::error::Error for ServerError {}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(%status, error = %self, "Request refused");
        }
        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}
