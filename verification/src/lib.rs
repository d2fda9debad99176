//! Identity verification pipeline.
//!
//! Three independent signals establish a user's identity:
//! 1. **Document**: an uploaded identity document is analyzed and validated.
//! 2. **Liveness**: a biometric capture session proves a live human is present.
//! 3. **Face match**: the live capture is compared against the document photo.
//!
//! The judges ([`DocumentValidator`], [`LivenessEvaluator`], [`FaceMatcher`])
//! are pure: they convert raw collaborator output into verdict values and
//! never touch storage or the network. The [`VerificationOrchestrator`]
//! sequences collaborator calls, applies the judges, and persists progress
//! to the verification store — negative verdicts are ordinary values, and
//! only infrastructure failures propagate as errors.

pub mod document;
pub mod error;
pub mod liveness;
pub mod matcher;
pub mod orchestrator;

pub use document::{DocumentValidator, DocumentVerdict};
pub use error::VerificationError;
pub use liveness::{LivenessEvaluator, LivenessVerdict};
pub use matcher::{FaceMatcher, FaceMatchVerdict};
pub use orchestrator::{
    DocumentOutcome, FaceMatchOutcome, LivenessOutcome, VerificationOrchestrator,
};
