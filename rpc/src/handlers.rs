//! RPC request and response types.

use attest_services::LivenessSession;
use attest_store::{VerificationRecord, VerificationStage};
use attest_types::{DocumentType, ImageKey, SessionId, SessionToken, Timestamp, UserId};
use attest_verification::{DocumentOutcome, FaceMatchOutcome, LivenessOutcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Requests ─────────────────────────────────────────────────────────────

/// The action-dispatch request body, keyed by the `action` field.
///
/// Each variant names exactly the inputs its action requires; an unknown
/// action or a missing field fails deserialization and is rejected before
/// any collaborator call.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum VerifyRequest {
    ProcessDocument {
        document_key: ImageKey,
        user_id: UserId,
    },
    StartLivenessSession {
        user_id: UserId,
    },
    VerifyLiveness {
        session_id: SessionId,
        user_id: UserId,
    },
    CompareFaces {
        user_id: UserId,
        source_image_key: ImageKey,
    },
}

impl VerifyRequest {
    /// The user this request concerns.
    pub fn user_id(&self) -> &UserId {
        match self {
            Self::ProcessDocument { user_id, .. }
            | Self::StartLivenessSession { user_id }
            | Self::VerifyLiveness { user_id, .. }
            | Self::CompareFaces { user_id, .. } => user_id,
        }
    }
}

// ── Responses ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProcessDocumentResponse {
    pub status: &'static str,
    pub document_key: ImageKey,
    pub is_valid: bool,
    pub document_type: DocumentType,
    pub fields: BTreeMap<String, String>,
    pub validation_errors: Vec<String>,
}

impl From<DocumentOutcome> for ProcessDocumentResponse {
    fn from(outcome: DocumentOutcome) -> Self {
        Self {
            status: "ok",
            document_key: outcome.document_key,
            is_valid: outcome.is_valid,
            document_type: outcome.document_type,
            fields: outcome.fields,
            validation_errors: outcome.validation_errors,
        }
    }
}

#[derive(Serialize)]
pub struct StartLivenessSessionResponse {
    pub status: &'static str,
    pub session_id: SessionId,
    pub session_token: SessionToken,
}

impl From<LivenessSession> for StartLivenessSessionResponse {
    fn from(session: LivenessSession) -> Self {
        Self {
            status: "ok",
            session_id: session.session_id,
            session_token: session.session_token,
        }
    }
}

#[derive(Serialize)]
pub struct VerifyLivenessResponse {
    pub status: &'static str,
    pub is_live: bool,
    pub confidence: Option<f64>,
    pub face_match: bool,
    pub similarity: Option<f64>,
    pub verification_completed: bool,
}

impl From<LivenessOutcome> for VerifyLivenessResponse {
    fn from(outcome: LivenessOutcome) -> Self {
        Self {
            status: "ok",
            is_live: outcome.is_live,
            confidence: outcome.confidence,
            face_match: outcome.face_match,
            similarity: outcome.similarity,
            verification_completed: outcome.verification_completed,
        }
    }
}

#[derive(Serialize)]
pub struct CompareFacesResponse {
    pub status: &'static str,
    pub matched: bool,
    pub similarity: f64,
}

impl From<FaceMatchOutcome> for CompareFacesResponse {
    fn from(outcome: FaceMatchOutcome) -> Self {
        Self {
            status: "ok",
            matched: outcome.matched,
            similarity: outcome.similarity,
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Per-user verification status derived from the stored record.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub user_id: UserId,
    pub stage: VerificationStage,
    pub document_valid: Option<bool>,
    pub liveness_passed: Option<bool>,
    pub face_matched: Option<bool>,
    pub verification_completed: bool,
    pub updated_at: Timestamp,
}

impl From<VerificationRecord> for StatusResponse {
    fn from(record: VerificationRecord) -> Self {
        Self {
            status: "ok",
            stage: record.stage(),
            document_valid: record.document_valid,
            liveness_passed: record.liveness_passed(),
            face_matched: record.face_matched(),
            verification_completed: record.verification_completed,
            updated_at: record.updated_at,
            user_id: record.user_id,
        }
    }
}
