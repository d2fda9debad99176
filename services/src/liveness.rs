//! Biometric liveness collaborator — session creation and result fetch.
//!
//! A liveness session is a time-bounded capture interaction: the service
//! issues a session id and a client token, the user completes the capture
//! out of band, and the pipeline later fetches the result. Sessions are
//! ephemeral; nothing is persisted until the result is verified.

use crate::ServiceError;
use async_trait::async_trait;
use attest_types::{ImageKey, SessionId, SessionToken, UserId};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A newly created liveness session.
#[derive(Clone, Debug)]
pub struct LivenessSession {
    pub session_id: SessionId,
    pub session_token: SessionToken,
}

/// The result of a completed liveness session.
///
/// `confidence` is `None` when the service has no usable score for the
/// session (expired, aborted, or still in progress) — the evaluator treats
/// that as a failure, never as a skipped check.
#[derive(Clone, Debug, Default)]
pub struct LivenessSessionResult {
    pub confidence: Option<f64>,
    /// Reference face image captured during the session, if any.
    pub reference_image: Option<ImageKey>,
}

/// Interface to the liveness-biometrics service.
#[async_trait]
pub trait LivenessService: Send + Sync {
    /// Create a new liveness session scoped to `user`, retaining at most
    /// `audit_images_limit` audit captures.
    async fn create_session(
        &self,
        user: &UserId,
        audit_images_limit: u32,
    ) -> Result<LivenessSession, ServiceError>;

    /// Fetch the result of a session.
    async fn session_result(
        &self,
        session_id: &SessionId,
    ) -> Result<LivenessSessionResult, ServiceError>;
}

/// Raw JSON response from session creation.
#[derive(Debug, Deserialize)]
struct CreateSessionResponse {
    session_id: String,
    session_token: String,
}

/// Raw JSON response from the session result endpoint.
#[derive(Debug, Deserialize)]
struct SessionResultResponse {
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    reference_image: Option<String>,
}

/// HTTP client for a liveness-biometrics service.
pub struct HttpLivenessService {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpLivenessService {
    pub fn new(base_url: &str) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }
}

#[async_trait]
impl LivenessService for HttpLivenessService {
    async fn create_session(
        &self,
        user: &UserId,
        audit_images_limit: u32,
    ) -> Result<LivenessSession, ServiceError> {
        let url = format!("{}/sessions", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({
                "user_id": user,
                "audit_images_limit": audit_images_limit,
            }))
            .send()
            .await
            .map_err(ServiceError::from_transport)?;

        if !response.status().is_success() {
            return Err(ServiceError::RequestFailed(format!(
                "HTTP status {} from {url}",
                response.status()
            )));
        }

        let raw: CreateSessionResponse = response.json().await.map_err(|e| {
            ServiceError::InvalidResponse(format!("failed to parse session response: {e}"))
        })?;

        tracing::debug!(user = %user, session = %raw.session_id, "liveness session created");

        Ok(LivenessSession {
            session_id: SessionId::new(raw.session_id),
            session_token: SessionToken::new(raw.session_token),
        })
    }

    async fn session_result(
        &self,
        session_id: &SessionId,
    ) -> Result<LivenessSessionResult, ServiceError> {
        let url = format!("{}/sessions/{}/result", self.base_url, session_id);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(ServiceError::from_transport)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(format!("session {session_id}")));
        }
        if !response.status().is_success() {
            return Err(ServiceError::RequestFailed(format!(
                "HTTP status {} from {url}",
                response.status()
            )));
        }

        let raw: SessionResultResponse = response.json().await.map_err(|e| {
            ServiceError::InvalidResponse(format!("failed to parse result response: {e}"))
        })?;

        Ok(LivenessSessionResult {
            confidence: raw.confidence,
            reference_image: raw.reference_image.map(ImageKey::new),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_response_tolerates_missing_fields() {
        let raw: SessionResultResponse = serde_json::from_str("{}").unwrap();
        assert!(raw.confidence.is_none());
        assert!(raw.reference_image.is_none());
    }

    #[test]
    fn test_result_response_full() {
        let raw: SessionResultResponse = serde_json::from_str(
            r#"{"confidence": 97.5, "reference_image": "liveness/u1/ref.jpg"}"#,
        )
        .unwrap();
        assert_eq!(raw.confidence, Some(97.5));
        assert_eq!(raw.reference_image.as_deref(), Some("liveness/u1/ref.jpg"));
    }
}
