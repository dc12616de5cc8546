//! Common API response types

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Error body returned by every endpoint: `{"success": false, "error": "..."}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human readable reason
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Handler error: status code plus JSON error body
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// HTTP status for a domain error
pub fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::BAD_REQUEST,
        DomainError::Storage(_) | DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert a domain error into an API error. Server-side failures are
/// logged and reported without internal detail.
pub fn api_error(e: DomainError) -> ApiError {
    let status = status_for(&e);
    let message = if status.is_server_error() {
        error!(error = %e, "Request failed");
        "Internal server error".to_string()
    } else {
        e.to_string()
    };
    (status, Json(ErrorResponse::new(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        let (status, Json(body)) = api_error(DomainError::user_not_found("ghost"));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!body.success);
        assert!(body.error.contains("ghost"));

        let (status, _) = api_error(DomainError::Conflict("taken".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn server_errors_hide_details() {
        let (status, Json(body)) =
            api_error(DomainError::Storage("Database error: disk I/O".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal server error");
    }
}
