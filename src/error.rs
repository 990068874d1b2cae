//! Unified error types.

use thiserror::Error as ThisError;

use crate::response::{IntoResponse, Response};
use crate::status::Status;
use crate::upstream::UpstreamError;

/// The error type returned by podstats' infrastructure operations.
///
/// Request-level failures (404, 405, upstream errors) are expressed as HTTP
/// [`Response`] values, not as `Error`s. This type surfaces failures that
/// stop the process from serving at all: bad configuration, binding to a
/// port, building the upstream client.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid socket address `{0}`")]
    InvalidAddress(String),

    #[error("upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// A failure raised by a route handler.
///
/// Rendered as `{"error": ..., "details": ...}`. The status mirrors the
/// upstream status when one is known and falls back to 500.
#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status code this error is answered with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Upstream(e) => e.status_code().unwrap_or(Status::InternalServerError.into()),
            Self::Internal(_) => Status::InternalServerError.into(),
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            Self::Upstream(UpstreamError::Http { .. }) => "Failed to fetch data from upstream API",
            Self::Upstream(UpstreamError::Network { .. }) => "Could not reach upstream API",
            Self::Upstream(UpstreamError::Decode { .. }) => "Upstream API returned an unreadable response",
            Self::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.summary(),
            "details": self.to_string(),
        });
        Response::builder()
            .code(self.status_code())
            .json(body.to_string().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_mirrored() {
        let err = ApiError::from(UpstreamError::Http { status: 403, body: "forbidden".into() });
        assert_eq!(err.status_code(), 403);

        let res = err.into_response();
        assert_eq!(res.status_code(), 403);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["error"], "Failed to fetch data from upstream API");
        assert!(body["details"].as_str().unwrap().contains("forbidden"));
    }

    #[test]
    fn network_failure_defaults_to_500() {
        let err = ApiError::from(UpstreamError::Network { message: "connection reset".into() });
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn decode_failure_defaults_to_500() {
        let err = ApiError::from(UpstreamError::Decode { message: "expected value at line 1 column 1".into() });
        assert_eq!(err.status_code(), 500);
    }
}
