use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// Errors a request can surface to the client. Every variant maps to
/// the `{"status": "<message>"}` wire shape.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A path id that does not parse as an integer.
    #[error("invalid parameter")]
    InvalidParameter,

    /// A request body that is not valid JSON (or not JSON at all).
    #[error("invalid parameter")]
    BadBody(#[from] JsonRejection),

    /// A keyed read, update or delete that affected zero rows.
    #[error("data not found")]
    NotFound,

    /// A store or hashing failure. Reported as a server fault; the
    /// chain is logged, the client sees only the generic message.
    #[error("internal error")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

/// Error body: `{"status": "<message>"}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Status {
    pub status: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = match &self {
            ApiError::InvalidParameter | ApiError::BadBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            ApiError::BadBody(rejection) => {
                warn!(error = %rejection, "rejected malformed request body")
            }
            ApiError::Internal(err) => error!(error = ?err, "request failed"),
            _ => {}
        }

        let body = Status {
            status: self.to_string(),
        };
        (code, Json(body)).into_response()
    }
}
