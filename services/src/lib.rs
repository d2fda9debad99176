//! External collaborator interfaces for the Attest verification pipeline.
//!
//! Each collaborator (object store, document analysis, liveness biometrics,
//! face comparison) is a trait; the orchestrator depends only on the traits,
//! so production HTTP clients and deterministic test doubles are
//! interchangeable. The HTTP implementations here talk JSON to the
//! respective services with bounded timeouts and map transport failures
//! into the [`ServiceError`] taxonomy.

pub mod analysis;
pub mod compare;
pub mod error;
pub mod liveness;
pub mod object_store;

pub use analysis::{DetectedFace, DocumentAnalysis, DocumentAnalyzer, HttpDocumentAnalyzer};
pub use compare::{FaceComparator, FaceImage, HttpFaceComparator, MatchCandidate};
pub use error::ServiceError;
pub use liveness::{
    HttpLivenessService, LivenessService, LivenessSession, LivenessSessionResult,
};
pub use object_store::{HttpObjectFetcher, ObjectFetcher};
