//! LMDB implementation of `VerificationStore`.
//!
//! Records are keyed by the raw user id bytes and bincode-encoded. The
//! merge operation performs its read-modify-write inside a single write
//! transaction, so concurrent merges for the same user serialize at the
//! LMDB layer and the last writer wins at field granularity. No transaction
//! ever spans an external call.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use attest_store::{merge_record, RecordPatch, StoreError, VerificationRecord, VerificationStore};
use attest_types::{Timestamp, UserId};

use crate::{LmdbEnvironment, LmdbError};

pub struct LmdbVerificationStore {
    env: Arc<Env>,
    records_db: Database<Bytes, Bytes>,
}

impl LmdbVerificationStore {
    pub fn new(environment: &LmdbEnvironment) -> Self {
        Self {
            env: environment.env.clone(),
            records_db: environment.records_db,
        }
    }

    fn decode(bytes: &[u8]) -> Result<VerificationRecord, LmdbError> {
        bincode::deserialize(bytes).map_err(|e| LmdbError::Serialization(e.to_string()))
    }

    fn encode(record: &VerificationRecord) -> Result<Vec<u8>, LmdbError> {
        bincode::serialize(record).map_err(|e| LmdbError::Serialization(e.to_string()))
    }
}

impl VerificationStore for LmdbVerificationStore {
    fn get(&self, user: &UserId) -> Result<Option<VerificationRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .records_db
            .get(&rtxn, user.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => Ok(Some(Self::decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn put(&self, record: &VerificationRecord) -> Result<(), StoreError> {
        let bytes = Self::encode(record)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.records_db
            .put(&mut wtxn, record.user_id.as_str().as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn merge(
        &self,
        user: &UserId,
        patch: &RecordPatch,
    ) -> Result<VerificationRecord, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let existing = self
            .records_db
            .get(&wtxn, user.as_str().as_bytes())
            .map_err(LmdbError::from)?
            .map(Self::decode)
            .transpose()?;

        let merged = merge_record(existing, user, patch, Timestamp::now())?;
        let bytes = Self::encode(&merged)?;
        self.records_db
            .put(&mut wtxn, user.as_str().as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(merged)
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.records_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }
}
