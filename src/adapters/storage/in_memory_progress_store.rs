//! In-Memory Progress Store Adapter
//!
//! Keeps records in a process-local map with per-entry expiry. Merges run
//! under the map's write lock, which makes them atomic within the process.
//! Useful for tests, development, and single-instance deployments.
//!
//! Expired entries read as absent. They leave the map when a merge finds
//! nothing to write for them, or when the expiry sweep passes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, RwLock};
use tokio::time;
use tracing::debug;

use crate::domain::intake::{FieldSchema, MergeOutcome, RecordKey, SubjectRecord};
use crate::ports::{ProgressStore, RecordUpdater, StoreError};

#[derive(Debug, Clone)]
struct Entry {
    record: SubjectRecord,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// How often `run_expiry_sweep` runs when the caller has no preference.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// In-memory progress store with TTL expiry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgressStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted writes (`set` calls plus dirty merges).
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    /// Drops expired entries.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    /// Purge expired entries every `every` until `shutdown` flips to true.
    pub async fn run_expiry_sweep(&self, every: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(every);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return;
                    }
                }
                _ = interval.tick() => {
                    let purged = self.purge_expired().await;
                    if purged > 0 {
                        debug!(purged, "Purged expired progress records");
                    }
                }
            }
        }
    }

    fn expiry(ttl: Duration) -> Instant {
        let now = Instant::now();
        now.checked_add(ttl).unwrap_or(now + Duration::from_secs(u32::MAX as u64))
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn get(&self, key: &RecordKey, schema: &FieldSchema) -> Result<SubjectRecord, StoreError> {
        let entries = self.entries.read().await;
        let record = entries
            .get(&key.to_cache_key())
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.record.clone().conform_to(schema))
            .unwrap_or_else(|| SubjectRecord::empty(schema));
        Ok(record)
    }

    async fn set(
        &self,
        key: &RecordKey,
        record: &SubjectRecord,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_cache_key(),
            Entry {
                record: record.clone(),
                expires_at: Self::expiry(ttl),
            },
        );
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn merge(
        &self,
        key: &RecordKey,
        schema: &FieldSchema,
        ttl: Duration,
        updater: RecordUpdater<'_>,
    ) -> Result<(MergeOutcome, SubjectRecord), StoreError> {
        let cache_key = key.to_cache_key();
        let mut entries = self.entries.write().await;

        let mut record = entries
            .get(&cache_key)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.record.clone().conform_to(schema))
            .unwrap_or_else(|| SubjectRecord::empty(schema));

        let outcome = updater(&mut record);
        if outcome.is_dirty() {
            entries.insert(
                cache_key,
                Entry {
                    record: record.clone(),
                    expires_at: Self::expiry(ttl),
                },
            );
            self.writes.fetch_add(1, Ordering::SeqCst);
        } else if entries
            .get(&cache_key)
            .is_some_and(|entry| !entry.is_live(Instant::now()))
        {
            entries.remove(&cache_key);
        }

        Ok((outcome, record))
    }
}
