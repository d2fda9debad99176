//! Verification record storage trait.

use crate::record::{RecordPatch, VerificationRecord};
use crate::StoreError;
use attest_types::UserId;

/// Trait for storing per-user verification records.
///
/// Implementations must make [`merge`](Self::merge) a field-level merge of
/// the patch into the stored record (creating the record if absent), never a
/// full-record overwrite: concurrent actions for the same user may
/// interleave, and a liveness update must not erase previously stored
/// document fields. [`merge_record`](crate::record::merge_record) provides
/// the canonical merge semantics; backends supply atomicity around it.
pub trait VerificationStore: Send + Sync {
    /// Fetch the record for a user, or `None` if the user has never
    /// submitted a document.
    fn get(&self, user: &UserId) -> Result<Option<VerificationRecord>, StoreError>;

    /// Store a complete record, replacing any existing one.
    fn put(&self, record: &VerificationRecord) -> Result<(), StoreError>;

    /// Apply a field-merge patch to the user's record, creating the record
    /// first if it does not exist. Returns the merged record.
    fn merge(&self, user: &UserId, patch: &RecordPatch)
        -> Result<VerificationRecord, StoreError>;

    /// Number of records in the store.
    fn record_count(&self) -> Result<u64, StoreError>;
}
