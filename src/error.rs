//! Error types.
//!
//! - [`ClientError`]: failures of the widget's HTTP backend.
//! - [`LlmError`]: failures talking to the upstream model.
//! - [`ApiError`]: what the service turns into a non-2xx response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ErrorBody;

/// Widget backend error.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure or undecodable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The endpoint answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder if it could not be read.
        message: String,
    },
}

/// Upstream model error.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("upstream model timed out")]
    Timeout,

    #[error("upstream model returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream transport error: {0}")]
    Transport(reqwest::Error),

    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

/// Service error, rendered as `{"detail": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("The assistant timed out, please try again later")]
    UpstreamTimeout,

    #[error("The assistant is temporarily unavailable: {0}")]
    Upstream(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyMessage => StatusCode::BAD_REQUEST,
            Self::UpstreamTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout => Self::UpstreamTimeout,
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
