use attest_services::ServiceError;
use attest_store::StoreError;
use attest_types::{SessionId, UserId};
use thiserror::Error;

/// Infrastructure and precondition failures in the verification pipeline.
///
/// Judgment rejections (invalid document, low confidence, low similarity)
/// are deliberately absent: they are ordinary outcome values, returned with
/// their evidence, never errors. "We could not check" and "we checked and it
/// failed" must stay distinguishable at every boundary.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// A comparison was requested for a user who never submitted a document.
    #[error("no document found for comparison (user {0})")]
    NoDocumentOnRecord(UserId),

    /// The liveness session passed but its result carried no reference
    /// image, so there is nothing to compare against the document.
    #[error("liveness session {0} returned no reference image")]
    MissingReferenceImage(SessionId),

    /// An external collaborator call failed.
    #[error("collaborator failure: {0}")]
    Service(#[from] ServiceError),

    /// The verification store failed.
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

impl VerificationError {
    /// Whether this is a precondition failure (the caller can fix the
    /// request) rather than an infrastructure fault.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::NoDocumentOnRecord(_))
    }
}
