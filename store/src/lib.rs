//! Abstract storage contract for the Attest verification pipeline.
//!
//! Every storage backend (LMDB, in-memory for testing) implements the
//! [`VerificationStore`] trait. The rest of the workspace depends only on
//! the trait and on the record/patch types defined here, so backends can be
//! swapped without touching the pipeline.

pub mod error;
pub mod record;
pub mod records;

pub use error::StoreError;
pub use record::{
    merge_record, Evidence, RecordPatch, VerificationRecord, VerificationStage,
};
pub use records::VerificationStore;
