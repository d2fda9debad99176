//! Axum-based RPC server.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use attest_types::UserId;
use attest_verification::VerificationOrchestrator;

use crate::error::RpcError;
use crate::handlers::{
    CompareFacesResponse, HealthResponse, ProcessDocumentResponse,
    StartLivenessSessionResponse, StatusResponse, VerifyLivenessResponse, VerifyRequest,
};

/// Shared state for the RPC server.
pub struct AppState {
    pub orchestrator: VerificationOrchestrator,
}

/// The RPC server, configured with a port and shared state.
pub struct RpcServer {
    pub port: u16,
    pub state: Arc<AppState>,
}

impl RpcServer {
    pub fn new(port: u16, orchestrator: VerificationOrchestrator) -> Self {
        Self {
            port,
            state: Arc::new(AppState { orchestrator }),
        }
    }

    /// Build the router. Separate from [`start`](Self::start) so tests can
    /// exercise the handlers without binding a socket.
    pub fn router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/v1/verify", post(verify_handler))
            .route("/api/v1/health", get(health_handler))
            .route("/api/v1/status/:user_id", get(status_handler))
            .with_state(state)
    }

    /// Start listening. Runs until the server is shut down.
    pub async fn start(&self) -> Result<(), std::io::Error> {
        let app = Self::router(self.state.clone());
        let addr = format!("0.0.0.0:{}", self.port);
        info!("RPC server listening on {}", addr);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await
    }
}

/// The single action-dispatch entry point.
///
/// The body is decoded as loose JSON first so that an unknown action or a
/// missing field comes back through the uniform error envelope instead of
/// the extractor's plain-text rejection.
async fn verify_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, RpcError> {
    let request: VerifyRequest = serde_json::from_value(body)
        .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;

    let user_id = request.user_id();
    if !user_id.is_valid() {
        return Err(RpcError::InvalidRequest(format!(
            "invalid user_id: {user_id:?}"
        )));
    }

    let orchestrator = &state.orchestrator;
    match request {
        VerifyRequest::ProcessDocument {
            ref document_key,
            ref user_id,
        } => {
            if document_key.is_empty() {
                return Err(RpcError::InvalidRequest("empty document_key".to_string()));
            }
            let outcome = orchestrator.process_document(user_id, document_key).await?;
            Ok(Json(ProcessDocumentResponse::from(outcome)).into_response())
        }
        VerifyRequest::StartLivenessSession { ref user_id } => {
            let session = orchestrator.start_liveness_session(user_id).await?;
            Ok(Json(StartLivenessSessionResponse::from(session)).into_response())
        }
        VerifyRequest::VerifyLiveness {
            ref session_id,
            ref user_id,
        } => {
            if !session_id.is_valid() {
                return Err(RpcError::InvalidRequest("empty session_id".to_string()));
            }
            let outcome = orchestrator.verify_liveness(user_id, session_id).await?;
            Ok(Json(VerifyLivenessResponse::from(outcome)).into_response())
        }
        VerifyRequest::CompareFaces {
            ref user_id,
            ref source_image_key,
        } => {
            if source_image_key.is_empty() {
                return Err(RpcError::InvalidRequest(
                    "empty source_image_key".to_string(),
                ));
            }
            let outcome = orchestrator
                .compare_faces(user_id, source_image_key)
                .await?;
            Ok(Json(CompareFacesResponse::from(outcome)).into_response())
        }
    }
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn status_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<StatusResponse>, RpcError> {
    let user = UserId::new(user_id);
    if !user.is_valid() {
        return Err(RpcError::InvalidRequest(format!("invalid user_id: {user:?}")));
    }
    let record = state
        .orchestrator
        .record(&user)?
        .ok_or_else(|| RpcError::RecordNotFound(user.to_string()))?;
    Ok(Json(StatusResponse::from(record)))
}
