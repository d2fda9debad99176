//! The per-user verification record and its field-merge patch types.
//!
//! The record tracks a user's progress through the three verification
//! signals (document, liveness, face match). It is created on the first
//! document submission, mutated in place by later actions, and never
//! deleted by the pipeline.
//!
//! Updates travel as [`RecordPatch`] values rather than arbitrary key/value
//! diffs: each patch variant names exactly the fields the corresponding
//! action is allowed to touch, and a pass/fail decision always travels with
//! the score that produced it (see [`Evidence`]), so a stored boolean can
//! never exist without its evidence.

use crate::StoreError;
use attest_types::{DocumentType, ImageKey, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A threshold decision together with the score that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// The raw score in [0,100] reported by the collaborator.
    pub score: f64,
    /// The decision derived by thresholding the score.
    pub passed: bool,
}

impl Evidence {
    pub fn new(score: f64, passed: bool) -> Self {
        Self { score, passed }
    }
}

/// Durable per-user verification state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Stable user identity, primary key.
    pub user_id: UserId,

    /// Reference to the stored document image. Set once per upload attempt;
    /// a retry overwrites it.
    pub document_key: Option<ImageKey>,

    /// Field name → extracted value (full name, date of birth, document
    /// number), produced by document analysis.
    pub extracted_fields: BTreeMap<String, String>,

    /// Document classification derived from the extracted text.
    pub document_type: DocumentType,

    /// Document validation verdict; `None` until a document has been
    /// processed.
    pub document_valid: Option<bool>,

    /// Ordered human-readable reasons the document failed validation.
    /// Empty when the document is valid.
    pub validation_errors: Vec<String>,

    /// Liveness decision with its confidence score; `None` until a liveness
    /// session has been verified with a usable result.
    pub liveness: Option<Evidence>,

    /// Face-match decision with its similarity score; `None` until a
    /// comparison has run.
    pub face_match: Option<Evidence>,

    /// True once document, liveness, and face match have all succeeded.
    /// Never reverts to false.
    pub verification_completed: bool,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl VerificationRecord {
    /// A fresh record for a user with no verification progress.
    pub fn new(user_id: UserId, now: Timestamp) -> Self {
        Self {
            user_id,
            document_key: None,
            extracted_fields: BTreeMap::new(),
            document_type: DocumentType::Unknown,
            document_valid: None,
            validation_errors: Vec::new(),
            liveness: None,
            face_match: None,
            verification_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn liveness_confidence(&self) -> Option<f64> {
        self.liveness.map(|e| e.score)
    }

    pub fn liveness_passed(&self) -> Option<bool> {
        self.liveness.map(|e| e.passed)
    }

    pub fn face_similarity(&self) -> Option<f64> {
        self.face_match.map(|e| e.score)
    }

    pub fn face_matched(&self) -> Option<bool> {
        self.face_match.map(|e| e.passed)
    }

    /// Where this record sits in the verification flow, derived from the
    /// stored fields. (A running liveness session is ephemeral and leaves no
    /// trace here until it is verified.)
    pub fn stage(&self) -> VerificationStage {
        if self.verification_completed {
            VerificationStage::Complete
        } else if let Some(face) = self.face_match {
            VerificationStage::FaceCompared(face.passed)
        } else if let Some(liveness) = self.liveness {
            VerificationStage::LivenessVerified(liveness.passed)
        } else if let Some(valid) = self.document_valid {
            VerificationStage::DocumentValidated(valid)
        } else if self.document_key.is_some() {
            VerificationStage::DocumentSubmitted
        } else {
            VerificationStage::NoDocument
        }
    }
}

/// Derived position of a record in the verification flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStage {
    NoDocument,
    DocumentSubmitted,
    /// Document processed; payload is the validity verdict.
    DocumentValidated(bool),
    /// Liveness session verified; payload is the pass verdict.
    LivenessVerified(bool),
    /// Face comparison ran; payload is the match verdict.
    FaceCompared(bool),
    Complete,
}

/// A field-merge update to a verification record.
///
/// One variant per action that is allowed to write; a variant can only name
/// the fields its action owns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RecordPatch {
    /// Written by `process_document`.
    Document {
        document_key: ImageKey,
        extracted_fields: BTreeMap<String, String>,
        document_type: DocumentType,
        document_valid: bool,
        validation_errors: Vec<String>,
    },
    /// Written by `verify_liveness`. `face_match` is present only when the
    /// liveness check passed and a comparison actually ran.
    Liveness {
        liveness: Evidence,
        face_match: Option<Evidence>,
        completed: bool,
    },
    /// Written by `compare_faces`; cannot touch `verification_completed`.
    FaceMatch { face_match: Evidence },
}

impl RecordPatch {
    /// Apply this patch to a record in place, bumping `updated_at`.
    ///
    /// `verification_completed` is OR-merged: once true it stays true, no
    /// matter what later patches carry.
    pub fn apply(&self, record: &mut VerificationRecord, now: Timestamp) {
        match self {
            RecordPatch::Document {
                document_key,
                extracted_fields,
                document_type,
                document_valid,
                validation_errors,
            } => {
                record.document_key = Some(document_key.clone());
                record.extracted_fields = extracted_fields.clone();
                record.document_type = *document_type;
                record.document_valid = Some(*document_valid);
                record.validation_errors = validation_errors.clone();
            }
            RecordPatch::Liveness {
                liveness,
                face_match,
                completed,
            } => {
                record.liveness = Some(*liveness);
                if let Some(face) = face_match {
                    record.face_match = Some(*face);
                }
                record.verification_completed |= *completed;
            }
            RecordPatch::FaceMatch { face_match } => {
                record.face_match = Some(*face_match);
            }
        }
        record.updated_at = now;
    }
}

/// Canonical merge semantics shared by every backend: load-or-create, apply
/// the patch, return the merged record. Backends wrap this in whatever
/// atomicity their medium provides.
pub fn merge_record(
    existing: Option<VerificationRecord>,
    user: &UserId,
    patch: &RecordPatch,
    now: Timestamp,
) -> Result<VerificationRecord, StoreError> {
    let mut record =
        existing.unwrap_or_else(|| VerificationRecord::new(user.clone(), now));
    patch.apply(&mut record, now);
    Ok(record)
}
