//! Progress Store Port - Persistence of partial subject records.
//!
//! Records are keyed by [`RecordKey`] and expire after a TTL, after which a
//! read yields an empty record again. Writers go through [`ProgressStore::merge`]
//! so concurrent evaluations of the same subject cannot lose each other's
//! fields.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::intake::{FieldSchema, MergeOutcome, RecordKey, SubjectRecord};

/// Errors raised by progress store adapters.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt record at '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    #[error("gave up merging '{key}' after {attempts} conflicting attempts")]
    Contention { key: String, attempts: u32 },

    #[error("failed to serialize record: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Mutation applied inside [`ProgressStore::merge`].
///
/// May be invoked more than once when an adapter retries after a conflict,
/// so it must be a pure function of the record it is given.
pub type RecordUpdater<'a> = &'a (dyn Fn(&mut SubjectRecord) -> MergeOutcome + Send + Sync);

/// Port for per-subject progress persistence.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Current record, conformed to `schema`.
    ///
    /// Absent or expired keys yield [`SubjectRecord::empty`].
    async fn get(&self, key: &RecordKey, schema: &FieldSchema) -> Result<SubjectRecord, StoreError>;

    /// Overwrites the record, expiring `ttl` from now.
    async fn set(
        &self,
        key: &RecordKey,
        record: &SubjectRecord,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    /// Atomic read-modify-write.
    ///
    /// Loads the current record (empty when absent), applies `updater`, and
    /// persists with a fresh `ttl` only when the outcome is dirty. Returns the
    /// outcome together with the record as it stands afterwards.
    async fn merge(
        &self,
        key: &RecordKey,
        schema: &FieldSchema,
        ttl: Duration,
        updater: RecordUpdater<'_>,
    ) -> Result<(MergeOutcome, SubjectRecord), StoreError>;
}
