//! Failure taxonomy for calls against the Prisma Cloud API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// DNS, TCP, TLS or timeout failure before a response arrived.
    #[error("connection to {endpoint} failed: {source}")]
    Connection {
        endpoint: String,
        #[source]
        source: ureq::Error,
    },

    /// Bad access key / secret key, or a token the API no longer accepts.
    #[error("authentication failed: {reason}")]
    Authentication { reason: String },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// The response body did not have the shape the report relies on.
    #[error("unexpected response from {endpoint}: {detail}")]
    UnexpectedResponse { endpoint: String, detail: String },
}

impl ApiError {
    pub(crate) fn missing_field(endpoint: &str, field: &str) -> Self {
        ApiError::UnexpectedResponse {
            endpoint: endpoint.to_string(),
            detail: format!("missing field `{}`", field),
        }
    }

    /// Maps a ureq failure for `endpoint`. 401/403 always mean the
    /// credentials or the token were refused.
    pub(crate) fn from_transport(endpoint: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status @ (401 | 403)) => ApiError::Authentication {
                reason: format!("{} returned HTTP {}", endpoint, status),
            },
            ureq::Error::StatusCode(status) => ApiError::Status {
                endpoint: endpoint.to_string(),
                status,
            },
            source => ApiError::Connection {
                endpoint: endpoint.to_string(),
                source,
            },
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ApiError::Authentication { .. })
    }
}
