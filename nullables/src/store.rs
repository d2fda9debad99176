//! Nullable store — thread-safe in-memory verification records for testing.

use attest_store::{
    merge_record, RecordPatch, StoreError, VerificationRecord, VerificationStore,
};
use attest_types::{Timestamp, UserId};
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory verification record store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullVerificationStore {
    records: Mutex<HashMap<String, VerificationRecord>>,
}

impl NullVerificationStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for NullVerificationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationStore for NullVerificationStore {
    fn get(&self, user: &UserId) -> Result<Option<VerificationRecord>, StoreError> {
        Ok(self.records.lock().unwrap().get(user.as_str()).cloned())
    }

    fn put(&self, record: &VerificationRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .insert(record.user_id.as_str().to_string(), record.clone());
        Ok(())
    }

    fn merge(
        &self,
        user: &UserId,
        patch: &RecordPatch,
    ) -> Result<VerificationRecord, StoreError> {
        let mut records = self.records.lock().unwrap();
        let existing = records.get(user.as_str()).cloned();
        let merged = merge_record(existing, user, patch, Timestamp::now())?;
        records.insert(user.as_str().to_string(), merged.clone());
        Ok(merged)
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        Ok(self.records.lock().unwrap().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_store::Evidence;
    use attest_types::ImageKey;
    use std::collections::BTreeMap;

    #[test]
    fn test_merge_creates_and_get_returns() {
        let store = NullVerificationStore::new();
        let user = UserId::new("u1");
        assert!(store.get(&user).unwrap().is_none());

        store
            .merge(
                &user,
                &RecordPatch::Document {
                    document_key: ImageKey::new("docs/u1/a.jpg"),
                    extracted_fields: BTreeMap::new(),
                    document_type: attest_types::DocumentType::Unknown,
                    document_valid: false,
                    validation_errors: vec!["Missing field: name".to_string()],
                },
            )
            .unwrap();

        let record = store.get(&user).unwrap().unwrap();
        assert_eq!(record.document_valid, Some(false));
        assert_eq!(store.record_count().unwrap(), 1);
    }

    #[test]
    fn test_merge_is_field_level() {
        let store = NullVerificationStore::new();
        let user = UserId::new("u1");
        store
            .merge(
                &user,
                &RecordPatch::Document {
                    document_key: ImageKey::new("docs/u1/a.jpg"),
                    extracted_fields: BTreeMap::new(),
                    document_type: attest_types::DocumentType::Passport,
                    document_valid: true,
                    validation_errors: Vec::new(),
                },
            )
            .unwrap();
        store
            .merge(
                &user,
                &RecordPatch::FaceMatch {
                    face_match: Evidence::new(55.0, false),
                },
            )
            .unwrap();

        let record = store.get(&user).unwrap().unwrap();
        assert_eq!(record.document_valid, Some(true));
        assert_eq!(record.face_similarity(), Some(55.0));
    }
}
