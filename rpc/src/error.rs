//! RPC error types and their HTTP mapping.

use attest_verification::VerificationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    /// Unknown action or missing/malformed required field. Rejected before
    /// any collaborator call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No verification record exists for the requested user.
    #[error("no verification record for user {0}")]
    RecordNotFound(String),

    /// A pipeline failure: precondition, collaborator, or storage.
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

/// JSON body for every error response.
#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    error: String,
}

impl RpcError {
    /// The HTTP status for this error.
    ///
    /// Judgment rejections never reach this mapping — they are 200-level
    /// outcomes. Only "could not check" conditions become error statuses:
    /// bad requests 400, missing preconditions 409, collaborator/storage
    /// faults 502.
    fn status_code(&self) -> StatusCode {
        match self {
            RpcError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            RpcError::Verification(e) if e.is_precondition() => StatusCode::CONFLICT,
            RpcError::Verification(VerificationError::Service(_)) => StatusCode::BAD_GATEWAY,
            RpcError::Verification(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        let body = ErrorBody {
            status: "error",
            error: self.to_string(),
        };
        if code.is_server_error() {
            tracing::error!(status = %code, error = %body.error, "request failed");
        } else {
            tracing::debug!(status = %code, error = %body.error, "request rejected");
        }
        (code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_services::ServiceError;
    use attest_types::UserId;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RpcError::InvalidRequest("missing user_id".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RpcError::RecordNotFound("u1".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RpcError::Verification(VerificationError::NoDocumentOnRecord(UserId::new("u1")))
                .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            RpcError::Verification(VerificationError::Service(ServiceError::Unreachable(
                "timeout".into()
            )))
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_precondition_message_names_condition() {
        let err =
            RpcError::Verification(VerificationError::NoDocumentOnRecord(UserId::new("u1")));
        assert!(err.to_string().contains("no document found for comparison"));
    }
}
