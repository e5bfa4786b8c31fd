//! Redis-backed progress store for multi-instance deployments.
//!
//! Records are stored as JSON under `RecordKey::to_cache_key()` with a
//! millisecond expiry (`SET .. PX`). Merges are optimistic: read, apply the
//! updater locally, then swap through a Lua script that only writes if the
//! stored payload is unchanged. Conflicts retry up to `max_merge_attempts`.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Script};
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::intake::{FieldSchema, MergeOutcome, RecordKey, SubjectRecord};
use crate::ports::{ProgressStore, RecordUpdater, StoreError};

/// KEYS[1] record key; ARGV: expected-present flag, expected payload, new payload, ttl ms.
const COMPARE_AND_SET: &str = r#"
local current = redis.call('GET', KEYS[1])
if ARGV[1] == '1' then
  if current ~= ARGV[2] then return 0 end
elseif current then
  return 0
end
redis.call('SET', KEYS[1], ARGV[3], 'PX', ARGV[4])
return 1
"#;

static COMPARE_AND_SET_SCRIPT: Lazy<Script> = Lazy::new(|| Script::new(COMPARE_AND_SET));

/// Redis progress store.
#[derive(Clone)]
pub struct RedisProgressStore {
    conn: MultiplexedConnection,
    max_merge_attempts: u32,
}

impl RedisProgressStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            max_merge_attempts: 5,
        }
    }

    /// Sets how many conflicting swaps a merge tolerates before giving up.
    pub fn with_max_merge_attempts(mut self, attempts: u32) -> Self {
        self.max_merge_attempts = attempts.max(1);
        self
    }

    async fn read_raw(&self, cache_key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        conn.get(cache_key)
            .await
            .map_err(|e: redis::RedisError| StoreError::Unavailable(e.to_string()))
    }
}

/// Parses a stored payload; absent means empty.
fn decode(
    cache_key: &str,
    raw: Option<&str>,
    schema: &FieldSchema,
) -> Result<SubjectRecord, StoreError> {
    match raw {
        None => Ok(SubjectRecord::empty(schema)),
        Some(json) => serde_json::from_str::<SubjectRecord>(json)
            .map(|record| record.conform_to(schema))
            .map_err(|e| StoreError::corrupt(cache_key, e.to_string())),
    }
}

/// Read-path decode: an unreadable payload counts as an absent record.
fn decode_or_empty(cache_key: &str, raw: Option<&str>, schema: &FieldSchema) -> SubjectRecord {
    decode(cache_key, raw, schema).unwrap_or_else(|err| {
        warn!(key = %cache_key, error = %err, "Treating unreadable record as empty");
        SubjectRecord::empty(schema)
    })
}

fn encode(record: &SubjectRecord) -> Result<String, StoreError> {
    serde_json::to_string(record).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl ProgressStore for RedisProgressStore {
    async fn get(&self, key: &RecordKey, schema: &FieldSchema) -> Result<SubjectRecord, StoreError> {
        let cache_key = key.to_cache_key();
        let raw = self.read_raw(&cache_key).await?;
        Ok(decode_or_empty(&cache_key, raw.as_deref(), schema))
    }

    async fn set(
        &self,
        key: &RecordKey,
        record: &SubjectRecord,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let payload = encode(record)?;
        let mut conn = self.conn.clone();

        redis::cmd("SET")
            .arg(key.to_cache_key())
            .arg(payload)
            .arg("PX")
            .arg(ttl_millis(ttl))
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn merge(
        &self,
        key: &RecordKey,
        schema: &FieldSchema,
        ttl: Duration,
        updater: RecordUpdater<'_>,
    ) -> Result<(MergeOutcome, SubjectRecord), StoreError> {
        let cache_key = key.to_cache_key();

        for attempt in 1..=self.max_merge_attempts {
            let raw = self.read_raw(&cache_key).await?;
            let mut record = decode_or_empty(&cache_key, raw.as_deref(), schema);

            let outcome = updater(&mut record);
            if !outcome.is_dirty() {
                return Ok((outcome, record));
            }

            let payload = encode(&record)?;
            let mut conn = self.conn.clone();
            let swapped: i64 = COMPARE_AND_SET_SCRIPT
                .key(&cache_key)
                .arg(if raw.is_some() { "1" } else { "0" })
                .arg(raw.as_deref().unwrap_or_default())
                .arg(payload)
                .arg(ttl_millis(ttl))
                .invoke_async(&mut conn)
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;

            if swapped == 1 {
                return Ok((outcome, record));
            }
            debug!(key = %cache_key, attempt, "Record changed during merge, retrying");
        }

        Err(StoreError::Contention {
            key: cache_key,
            attempts: self.max_merge_attempts,
        })
    }
}

impl std::fmt::Debug for RedisProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisProgressStore")
            .field("max_merge_attempts", &self.max_merge_attempts)
            .finish_non_exhaustive()
    }
}
