//! Verification orchestrator — connects document analysis, liveness
//! evaluation, and face matching into a single end-to-end verification
//! workflow, persisting per-user progress between the independently-failing
//! steps.
//!
//! Every action is a stateless request handler: it loads what it needs from
//! the verification store at the start, calls the collaborators it requires,
//! applies the relevant judge, and commits one typed patch at the end. No
//! lock is held across a collaborator call; concurrent actions for the same
//! user resolve last-writer-wins at field granularity.

use crate::document::{classify, extract_key_fields, DocumentValidator};
use crate::error::VerificationError;
use crate::liveness::{LivenessEvaluator, LivenessVerdict};
use crate::matcher::FaceMatcher;
use attest_services::{
    DocumentAnalyzer, FaceComparator, FaceImage, LivenessService, LivenessSession,
    ObjectFetcher,
};
use attest_store::{Evidence, RecordPatch, VerificationRecord, VerificationStore};
use attest_types::{DocumentType, ImageKey, SessionId, UserId, VerificationParams};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Outcome of `process_document`: the validity verdict plus the extracted
/// summary. Returned to the caller and persisted in the same shape.
#[derive(Clone, Debug, Serialize)]
pub struct DocumentOutcome {
    pub document_key: ImageKey,
    pub is_valid: bool,
    pub document_type: DocumentType,
    pub fields: BTreeMap<String, String>,
    pub validation_errors: Vec<String>,
}

/// Outcome of `verify_liveness`: the liveness decision and, when liveness
/// passed, the face-match decision that followed it.
#[derive(Clone, Debug, Serialize)]
pub struct LivenessOutcome {
    pub is_live: bool,
    pub confidence: Option<f64>,
    pub face_match: bool,
    pub similarity: Option<f64>,
    pub verification_completed: bool,
}

/// Outcome of an out-of-band `compare_faces`.
#[derive(Clone, Debug, Serialize)]
pub struct FaceMatchOutcome {
    pub matched: bool,
    pub similarity: f64,
}

/// The orchestrator ties the judges and external collaborators together.
///
/// All collaborators are injected at construction, so tests substitute
/// deterministic doubles for every external dependency.
pub struct VerificationOrchestrator {
    params: VerificationParams,
    store: Arc<dyn VerificationStore>,
    analyzer: Arc<dyn DocumentAnalyzer>,
    liveness: Arc<dyn LivenessService>,
    comparator: Arc<dyn FaceComparator>,
    objects: Arc<dyn ObjectFetcher>,
    validator: DocumentValidator,
    evaluator: LivenessEvaluator,
    matcher: FaceMatcher,
}

impl VerificationOrchestrator {
    pub fn new(
        params: VerificationParams,
        store: Arc<dyn VerificationStore>,
        analyzer: Arc<dyn DocumentAnalyzer>,
        liveness: Arc<dyn LivenessService>,
        comparator: Arc<dyn FaceComparator>,
        objects: Arc<dyn ObjectFetcher>,
    ) -> Self {
        Self {
            store,
            analyzer,
            liveness,
            comparator,
            objects,
            validator: DocumentValidator::new(),
            evaluator: LivenessEvaluator::new(params.min_liveness_confidence),
            matcher: FaceMatcher::new(params.face_similarity_threshold),
            params,
        }
    }

    /// Analyze and validate the document stored at `document_key`, then
    /// persist the document fields on the user's record (creating it on
    /// first contact).
    ///
    /// A failed analysis call leaves the record unmutated for this attempt.
    /// An invalid document is a normal outcome: persisted, returned with
    /// its error list, and never an `Err`. The caller decides when to
    /// proceed to liveness.
    pub async fn process_document(
        &self,
        user: &UserId,
        document_key: &ImageKey,
    ) -> Result<DocumentOutcome, VerificationError> {
        tracing::info!(user = %user, key = %document_key, "processing document");

        let analysis = self.analyzer.analyze(document_key).await?;
        let text = analysis.text();

        let verdict = self.validator.validate(&text, &analysis.faces);
        // Classified once; the stored record and the response must agree.
        let document_type = classify(&text);
        let fields = extract_key_fields(&text);

        self.store.merge(
            user,
            &RecordPatch::Document {
                document_key: document_key.clone(),
                extracted_fields: fields.clone(),
                document_type,
                document_valid: verdict.is_valid,
                validation_errors: verdict.errors.clone(),
            },
        )?;

        tracing::info!(
            user = %user,
            valid = verdict.is_valid,
            document_type = %document_type,
            "document processed"
        );

        Ok(DocumentOutcome {
            document_key: document_key.clone(),
            is_valid: verdict.is_valid,
            document_type,
            fields,
            validation_errors: verdict.errors,
        })
    }

    /// Request a new liveness session for the user.
    ///
    /// Sessions are ephemeral: nothing touches the store until the session
    /// result is verified.
    pub async fn start_liveness_session(
        &self,
        user: &UserId,
    ) -> Result<LivenessSession, VerificationError> {
        tracing::info!(user = %user, "starting liveness session");
        let session = self
            .liveness
            .create_session(user, self.params.audit_images_limit)
            .await?;
        tracing::info!(user = %user, session = %session.session_id, "liveness session created");
        Ok(session)
    }

    /// Fetch and judge a completed liveness session; on pass, compare the
    /// session's reference image against the user's stored document and
    /// persist the combined result.
    ///
    /// Requires a document on record — absence is a precondition failure
    /// reported before any collaborator call, never a biometric failure.
    pub async fn verify_liveness(
        &self,
        user: &UserId,
        session_id: &SessionId,
    ) -> Result<LivenessOutcome, VerificationError> {
        tracing::info!(user = %user, session = %session_id, "verifying liveness session");

        let record = self.store.get(user)?;
        let document_key = record
            .as_ref()
            .and_then(|r| r.document_key.clone())
            .ok_or_else(|| VerificationError::NoDocumentOnRecord(user.clone()))?;
        let document_valid = record
            .as_ref()
            .and_then(|r| r.document_valid)
            .unwrap_or(false);

        let result = self.liveness.session_result(session_id).await?;

        match self.evaluator.evaluate(result.confidence) {
            LivenessVerdict::Unavailable => {
                // No evidence to persist: the record keeps whatever it had.
                tracing::warn!(
                    user = %user,
                    session = %session_id,
                    "liveness session returned no confidence"
                );
                Ok(LivenessOutcome {
                    is_live: false,
                    confidence: None,
                    face_match: false,
                    similarity: None,
                    verification_completed: false,
                })
            }
            LivenessVerdict::Rejected { confidence } => {
                let merged = self.store.merge(
                    user,
                    &RecordPatch::Liveness {
                        liveness: Evidence::new(confidence, false),
                        face_match: None,
                        completed: false,
                    },
                )?;
                tracing::info!(
                    user = %user,
                    confidence,
                    threshold = self.evaluator.min_confidence(),
                    "liveness below threshold"
                );
                Ok(LivenessOutcome {
                    is_live: false,
                    confidence: Some(confidence),
                    face_match: false,
                    similarity: None,
                    verification_completed: merged.verification_completed,
                })
            }
            LivenessVerdict::Passed { confidence } => {
                let reference = result.reference_image.ok_or_else(|| {
                    VerificationError::MissingReferenceImage(session_id.clone())
                })?;
                let reference_bytes = self.objects.fetch(&reference).await?;

                let candidates = self
                    .comparator
                    .compare(
                        &FaceImage::Key(document_key),
                        &FaceImage::Bytes(reference_bytes),
                    )
                    .await?;
                let match_verdict = self.matcher.decide(&candidates);

                let completed = document_valid && match_verdict.matched;
                let merged = self.store.merge(
                    user,
                    &RecordPatch::Liveness {
                        liveness: Evidence::new(confidence, true),
                        face_match: Some(Evidence::new(
                            match_verdict.similarity,
                            match_verdict.matched,
                        )),
                        completed,
                    },
                )?;

                tracing::info!(
                    user = %user,
                    confidence,
                    similarity = match_verdict.similarity,
                    matched = match_verdict.matched,
                    completed = merged.verification_completed,
                    "liveness verified"
                );

                Ok(LivenessOutcome {
                    is_live: true,
                    confidence: Some(confidence),
                    face_match: match_verdict.matched,
                    similarity: Some(match_verdict.similarity),
                    verification_completed: merged.verification_completed,
                })
            }
        }
    }

    /// Out-of-band re-match between the stored document and an arbitrary
    /// second image. Persists only the match fields; never touches
    /// `verification_completed`.
    pub async fn compare_faces(
        &self,
        user: &UserId,
        source_image_key: &ImageKey,
    ) -> Result<FaceMatchOutcome, VerificationError> {
        tracing::info!(user = %user, source = %source_image_key, "comparing faces");

        let document_key = self
            .store
            .get(user)?
            .and_then(|r| r.document_key)
            .ok_or_else(|| VerificationError::NoDocumentOnRecord(user.clone()))?;

        let candidates = self
            .comparator
            .compare(
                &FaceImage::Key(document_key),
                &FaceImage::Key(source_image_key.clone()),
            )
            .await?;
        let verdict = self.matcher.decide(&candidates);

        self.store.merge(
            user,
            &RecordPatch::FaceMatch {
                face_match: Evidence::new(verdict.similarity, verdict.matched),
            },
        )?;

        tracing::info!(
            user = %user,
            matched = verdict.matched,
            similarity = verdict.similarity,
            "face comparison complete"
        );

        Ok(FaceMatchOutcome {
            matched: verdict.matched,
            similarity: verdict.similarity,
        })
    }

    /// The user's current record, if any. Used for status reporting.
    pub fn record(&self, user: &UserId) -> Result<Option<VerificationRecord>, VerificationError> {
        Ok(self.store.get(user)?)
    }
}
