//! Read-only providers feeding the response generator.

use std::sync::Arc;
use tracing::warn;

use crate::domain::intake::{completion_signal, render_status, status_fallback};
use crate::ports::ProgressStore;

use super::{InboundMessage, IntakeSettings};

/// Renders what is known about the subject and what is still missing.
pub struct StatusProvider {
    store: Arc<dyn ProgressStore>,
    settings: IntakeSettings,
}

impl StatusProvider {
    pub fn new(store: Arc<dyn ProgressStore>, settings: IntakeSettings) -> Self {
        Self { store, settings }
    }

    /// Status directive; the schema's fallback text if the store fails.
    pub async fn get(&self, message: &InboundMessage) -> String {
        let key = self.settings.key_for(&message.subject_id);
        match self.store.get(&key, &self.settings.schema).await {
            Ok(record) => render_status(&self.settings.schema, &self.settings.agent, &record),
            Err(err) => {
                warn!(key = %key, error = %err, "Progress store read failed in status provider");
                status_fallback(&self.settings.schema)
            }
        }
    }
}

/// Emits the schema's completion directive once every field is known.
pub struct CompletionSignalProvider {
    store: Arc<dyn ProgressStore>,
    settings: IntakeSettings,
}

impl CompletionSignalProvider {
    pub fn new(store: Arc<dyn ProgressStore>, settings: IntakeSettings) -> Self {
        Self { store, settings }
    }

    /// Completion directive, or empty while incomplete or on error.
    pub async fn get(&self, message: &InboundMessage) -> String {
        let key = self.settings.key_for(&message.subject_id);
        match self.store.get(&key, &self.settings.schema).await {
            Ok(record) => completion_signal(&self.settings.schema, &record),
            Err(err) => {
                warn!(key = %key, error = %err, "Progress store read failed in completion provider");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryProgressStore;
    use crate::domain::foundation::{AgentName, SubjectId, Timestamp};
    use crate::domain::intake::{
        ExtractedFields, FieldSchema, MergeOutcome, RecordKey, SchemaTag, SubjectRecord,
    };
    use crate::ports::{RecordUpdater, StoreError};
    use async_trait::async_trait;
    use std::time::Duration;

    struct BrokenStore;

    #[async_trait]
    impl ProgressStore for BrokenStore {
        async fn get(&self, _: &RecordKey, _: &FieldSchema) -> Result<SubjectRecord, StoreError> {
            Err(StoreError::corrupt("k", "truncated"))
        }

        async fn set(&self, _: &RecordKey, _: &SubjectRecord, _: Duration) -> Result<(), StoreError> {
            Ok(())
        }

        async fn merge(
            &self,
            _: &RecordKey,
            _: &FieldSchema,
            _: Duration,
            _: RecordUpdater<'_>,
        ) -> Result<(MergeOutcome, SubjectRecord), StoreError> {
            Err(StoreError::unavailable("down"))
        }
    }

    fn settings(tag: &str) -> IntakeSettings {
        IntakeSettings::new(
            AgentName::new("Joe").unwrap(),
            FieldSchema::builtin(tag).unwrap(),
        )
    }

    fn message() -> InboundMessage {
        InboundMessage::new(SubjectId::new("user-1").unwrap(), "hello")
    }

    async fn seed(store: &InMemoryProgressStore, settings: &IntakeSettings, fields: ExtractedFields) {
        let mut record = SubjectRecord::empty(&settings.schema);
        record.merge(&fields, Timestamp::now());
        store
            .set(&settings.key_for(&message().subject_id), &record, settings.record_ttl)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn status_shows_known_name_and_asks_for_the_rest() {
        let store = InMemoryProgressStore::new();
        let settings = settings(SchemaTag::USER_PROFILE);
        seed(&store, &settings, ExtractedFields::new().with("name", "Alice")).await;
        let provider = StatusProvider::new(Arc::new(store), settings);

        let text = provider.get(&message()).await;

        assert!(text.contains("Name: Alice"));
        assert!(text.contains("Location:\n- Description"));
        assert!(text.contains("Occupation:\n- Description"));
    }

    #[tokio::test]
    async fn status_falls_back_when_store_fails() {
        let provider = StatusProvider::new(Arc::new(BrokenStore), settings(SchemaTag::USER_PROFILE));
        assert_eq!(
            provider.get(&message()).await,
            "Error accessing user information. Continuing conversation normally."
        );
    }

    #[tokio::test]
    async fn completion_signal_only_after_every_field() {
        let store = InMemoryProgressStore::new();
        let settings = settings(SchemaTag::NFT_REQUEST);
        let provider = CompletionSignalProvider::new(Arc::new(store.clone()), settings.clone());

        seed(&store, &settings, ExtractedFields::new().with("name", "Adidas Campus")).await;
        assert_eq!(provider.get(&message()).await, "");

        seed(
            &store,
            &settings,
            ExtractedFields::new()
                .with("name", "Adidas Campus")
                .with("description", "A pair of shoes")
                .with("recipient", "wevm.eth"),
        )
        .await;
        assert_eq!(provider.get(&message()).await, settings.schema.completion_directive);
    }

    #[tokio::test]
    async fn completion_signal_is_empty_when_store_fails() {
        let provider =
            CompletionSignalProvider::new(Arc::new(BrokenStore), settings(SchemaTag::USER_PROFILE));
        assert_eq!(provider.get(&message()).await, "");
    }
}
