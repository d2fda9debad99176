//! Collaborator error taxonomy.

use thiserror::Error;

/// A failure talking to an external collaborator.
///
/// These are infrastructure failures — "we could not check" — and are kept
/// strictly separate from negative judgments ("we checked and it failed"),
/// which are ordinary values in the pipeline.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service unreachable: {0}")]
    Unreachable(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("object not found: {0}")]
    NotFound(String),
}

impl ServiceError {
    /// Map a reqwest transport error into the taxonomy.
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceError::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            ServiceError::Unreachable(format!("connection failed: {e}"))
        } else {
            ServiceError::RequestFailed(e.to_string())
        }
    }
}
