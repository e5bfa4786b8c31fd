//! ExtractionEvaluator - grows a subject's record from each inbound message.
//!
//! Runs only while the record is incomplete. Extraction happens outside the
//! store's atomic section; the merge itself goes through
//! [`ProgressStore::merge`] so concurrent messages for one subject cannot lose
//! fields, and exactly one of them observes the completing edge.
//!
//! Every failure is logged and swallowed: a broken store or extractor costs
//! at most one round of progress, never the conversation.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::foundation::{EventEnvelope, Timestamp};
use crate::domain::intake::{RecordKey, SubjectRecord, SubjectRecordCompleted};
use crate::ports::{EventPublisher, FieldExtractor, ProgressStore};

use super::{InboundMessage, IntakeSettings};

/// What one `process` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// Record already complete; nothing attempted.
    Skipped,
    /// Extraction found nothing that was not already known.
    NothingNew,
    /// New fields were stored.
    Updated { accepted: Vec<String>, completed: bool },
    /// A collaborator failed; the round was dropped.
    Failed,
}

pub struct ExtractionEvaluator {
    store: Arc<dyn ProgressStore>,
    extractor: Arc<dyn FieldExtractor>,
    publisher: Arc<dyn EventPublisher>,
    settings: IntakeSettings,
}

impl ExtractionEvaluator {
    pub fn new(
        store: Arc<dyn ProgressStore>,
        extractor: Arc<dyn FieldExtractor>,
        publisher: Arc<dyn EventPublisher>,
        settings: IntakeSettings,
    ) -> Self {
        Self {
            store,
            extractor,
            publisher,
            settings,
        }
    }

    /// True while the subject's record is incomplete. Store errors answer false.
    pub async fn should_run(&self, message: &InboundMessage) -> bool {
        let key = self.settings.key_for(&message.subject_id);
        match self.store.get(&key, &self.settings.schema).await {
            Ok(record) => !record.is_complete(),
            Err(err) => {
                warn!(key = %key, error = %err, "Progress store read failed in should_run");
                false
            }
        }
    }

    pub async fn process(&self, message: &InboundMessage) -> Evaluation {
        let schema = &self.settings.schema;
        let key = self.settings.key_for(&message.subject_id);

        let current = match self.store.get(&key, schema).await {
            Ok(record) => record,
            Err(err) => {
                warn!(key = %key, error = %err, "Progress store read failed; skipping extraction");
                return Evaluation::Failed;
            }
        };
        if current.is_complete() {
            debug!(key = %key, "Record complete; skipping extraction");
            return Evaluation::Skipped;
        }

        let extracted = match self.extractor.extract(&message.text, schema).await {
            Ok(fields) => fields,
            Err(err) => {
                warn!(key = %key, error = %err, "Extraction failed; treating as nothing found");
                return Evaluation::NothingNew;
            }
        };
        if extracted.is_empty() {
            return Evaluation::NothingNew;
        }

        let now = Timestamp::now();
        let updater = |record: &mut SubjectRecord| record.merge(&extracted, now);
        let (outcome, record) = match self
            .store
            .merge(&key, schema, self.settings.record_ttl, &updater)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                error!(key = %key, error = %err, "Failed to persist extracted fields");
                return Evaluation::Failed;
            }
        };

        if !outcome.is_dirty() {
            return Evaluation::NothingNew;
        }

        info!(
            key = %key,
            accepted = ?outcome.accepted,
            missing = ?record.missing_fields(),
            "Subject record updated"
        );

        let completed = outcome.completed_now();
        if completed {
            info!(key = %key, "Subject record complete");
            self.announce_completion(message, &key, &record, now).await;
        }

        Evaluation::Updated {
            accepted: outcome.accepted,
            completed,
        }
    }

    async fn announce_completion(
        &self,
        message: &InboundMessage,
        key: &RecordKey,
        record: &SubjectRecord,
        now: Timestamp,
    ) {
        let event = SubjectRecordCompleted::new(key, record, now);
        let envelope = match EventEnvelope::from_event(&event) {
            Ok(envelope) => envelope.with_subject_id(message.subject_id.as_str()),
            Err(err) => {
                error!(key = %key, error = %err, "Failed to serialize completion event");
                return;
            }
        };
        let envelope = match &message.correlation_id {
            Some(id) => envelope.with_correlation_id(id.clone()),
            None => envelope,
        };

        if let Err(err) = self.publisher.publish(envelope).await {
            error!(key = %key, error = %err, "Completion handlers failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::storage::InMemoryProgressStore;
    use crate::domain::foundation::{AgentName, SubjectId};
    use crate::domain::intake::{
        ExtractedFields, FieldSchema, MergeOutcome, RecordKey, SchemaTag,
    };
    use crate::ports::{AIError, ExtractionError, RecordUpdater, StoreError};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Returns queued extraction rounds, then empty results.
    struct ScriptedExtractor {
        rounds: Mutex<VecDeque<Result<ExtractedFields, ExtractionError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedExtractor {
        fn new(rounds: Vec<Result<ExtractedFields, ExtractionError>>) -> Arc<Self> {
            Arc::new(Self {
                rounds: Mutex::new(rounds.into()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl FieldExtractor for ScriptedExtractor {
        async fn extract(
            &self,
            _text: &str,
            _schema: &FieldSchema,
        ) -> Result<ExtractedFields, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rounds
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ExtractedFields::new()))
        }
    }

    /// Store whose reads always fail.
    struct UnreachableStore {
        merges: AtomicUsize,
    }

    #[async_trait]
    impl ProgressStore for UnreachableStore {
        async fn get(&self, _: &RecordKey, _: &FieldSchema) -> Result<SubjectRecord, StoreError> {
            Err(StoreError::unavailable("connection refused"))
        }

        async fn set(&self, _: &RecordKey, _: &SubjectRecord, _: Duration) -> Result<(), StoreError> {
            Err(StoreError::unavailable("connection refused"))
        }

        async fn merge(
            &self,
            _: &RecordKey,
            _: &FieldSchema,
            _: Duration,
            _: RecordUpdater<'_>,
        ) -> Result<(MergeOutcome, SubjectRecord), StoreError> {
            self.merges.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::unavailable("connection refused"))
        }
    }

    fn settings() -> IntakeSettings {
        IntakeSettings::new(
            AgentName::new("Joe").unwrap(),
            FieldSchema::builtin(SchemaTag::USER_PROFILE).unwrap(),
        )
    }

    fn message(text: &str) -> InboundMessage {
        InboundMessage::new(SubjectId::new("user-1").unwrap(), text)
    }

    struct Harness {
        evaluator: ExtractionEvaluator,
        store: InMemoryProgressStore,
        extractor: Arc<ScriptedExtractor>,
        bus: Arc<InMemoryEventBus>,
    }

    fn harness(rounds: Vec<Result<ExtractedFields, ExtractionError>>) -> Harness {
        let store = InMemoryProgressStore::new();
        let extractor = ScriptedExtractor::new(rounds);
        let bus = Arc::new(InMemoryEventBus::new());
        let evaluator = ExtractionEvaluator::new(
            Arc::new(store.clone()),
            extractor.clone(),
            bus.clone(),
            settings(),
        );
        Harness {
            evaluator,
            store,
            extractor,
            bus,
        }
    }

    #[tokio::test]
    async fn first_message_populates_record() {
        let h = harness(vec![Ok(ExtractedFields::new()
            .with("name", "David Chen")
            .with("location", "Chicago")
            .with("occupation", "dentist"))]);
        let msg = message("Hi everyone! I'm David Chen, working as a dentist here in Chicago.");

        assert!(h.evaluator.should_run(&msg).await);
        let result = h.evaluator.process(&msg).await;

        assert!(matches!(result, Evaluation::Updated { completed: true, .. }));
        let record = h
            .store
            .get(&settings().key_for(&msg.subject_id), &settings().schema)
            .await
            .unwrap();
        assert!(record.is_complete());
        assert!(record.last_updated().is_some());
        assert!(!h.evaluator.should_run(&msg).await);
    }

    #[tokio::test]
    async fn completion_event_published_exactly_once() {
        let h = harness(vec![
            Ok(ExtractedFields::new().with("name", "Alice")),
            Ok(ExtractedFields::new().with("location", "Paris").with("occupation", "chef")),
            Ok(ExtractedFields::new().with("occupation", "baker")),
        ]);

        for text in ["I'm Alice", "I live in Paris and cook", "Actually I bake"] {
            h.evaluator.process(&message(text).with_correlation_id("corr-1")).await;
        }

        let events = h.bus.events_of_type(SubjectRecordCompleted::EVENT_TYPE);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].metadata.correlation_id.as_deref(), Some("corr-1"));
        let completed: SubjectRecordCompleted = events[0].payload_as().unwrap();
        assert_eq!(completed.field("occupation"), Some("chef"));
    }

    #[tokio::test]
    async fn complete_record_is_never_extracted_or_written() {
        let h = harness(vec![Ok(ExtractedFields::new()
            .with("name", "A")
            .with("location", "B")
            .with("occupation", "C"))]);
        h.evaluator.process(&message("all of it")).await;
        let writes = h.store.write_count();

        let result = h.evaluator.process(&message("My name is Bob")).await;

        assert_eq!(result, Evaluation::Skipped);
        assert_eq!(h.extractor.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.store.write_count(), writes);
    }

    #[tokio::test]
    async fn no_new_fields_means_no_write() {
        let h = harness(vec![
            Ok(ExtractedFields::new().with("name", "Alice")),
            Ok(ExtractedFields::new().with("name", "Alicia")),
            Ok(ExtractedFields::new()),
        ]);

        h.evaluator.process(&message("I'm Alice")).await;
        assert_eq!(h.evaluator.process(&message("call me Alicia")).await, Evaluation::NothingNew);
        assert_eq!(h.evaluator.process(&message("nice weather")).await, Evaluation::NothingNew);

        assert_eq!(h.store.write_count(), 1);
    }

    #[tokio::test]
    async fn extraction_failure_is_an_empty_round() {
        let h = harness(vec![Err(ExtractionError::Provider(AIError::network("reset")))]);

        let result = h.evaluator.process(&message("I'm Alice")).await;

        assert_eq!(result, Evaluation::NothingNew);
        assert_eq!(h.store.write_count(), 0);
        assert!(h.evaluator.should_run(&message("again")).await);
    }

    #[tokio::test]
    async fn store_read_failure_skips_extraction_and_write() {
        let store = Arc::new(UnreachableStore {
            merges: AtomicUsize::new(0),
        });
        let extractor = ScriptedExtractor::new(vec![Ok(ExtractedFields::new().with("name", "Alice"))]);
        let evaluator = ExtractionEvaluator::new(
            store.clone(),
            extractor.clone(),
            Arc::new(InMemoryEventBus::new()),
            settings(),
        );

        assert!(!evaluator.should_run(&message("I'm Alice")).await);
        assert_eq!(evaluator.process(&message("I'm Alice")).await, Evaluation::Failed);
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.merges.load(Ordering::SeqCst), 0);
    }
}
