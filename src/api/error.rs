use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::models::ErrorBody;

/// Failure of a copier API call.
///
/// The `Display` output of every variant is the operator-facing message:
/// for non-success responses it is the `detail` sent by the server, or the
/// caller-supplied fallback when the body carries none.
#[derive(Clone, Debug, Error)]
pub enum ApiError {
    #[error("{detail}")]
    Status { status: u16, detail: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Decode(String),
}

impl ApiError {
    pub fn internal(detail: impl Into<String>) -> Self {
        ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            detail: detail.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Status { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Transport(_) => StatusCode::BAD_GATEWAY,
            ApiError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the error for a non-success response body.
    ///
    /// Uses the body's `detail` verbatim when present and a string, otherwise
    /// falls back to `fallback`.
    pub fn from_response_body(status: u16, body: &[u8], fallback: &str) -> Self {
        let detail = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| match value.get("detail") {
                Some(serde_json::Value::String(detail)) => Some(detail.clone()),
                _ => None,
            })
            .unwrap_or_else(|| fallback.to_string());
        ApiError::Status { status, detail }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            detail: Some(self.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
