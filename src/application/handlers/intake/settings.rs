//! Per-deployment intake settings and the inbound message shape.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::{AgentName, SubjectId};
use crate::domain::intake::{FieldSchema, RecordKey};

/// One week.
pub const DEFAULT_RECORD_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// What an intake pipeline collects, for whom, and for how long.
#[derive(Debug, Clone)]
pub struct IntakeSettings {
    pub agent: AgentName,
    pub schema: Arc<FieldSchema>,
    pub record_ttl: Duration,
}

impl IntakeSettings {
    pub fn new(agent: AgentName, schema: FieldSchema) -> Self {
        Self {
            agent,
            schema: Arc::new(schema),
            record_ttl: DEFAULT_RECORD_TTL,
        }
    }

    pub fn with_record_ttl(mut self, ttl: Duration) -> Self {
        self.record_ttl = ttl;
        self
    }

    pub fn key_for(&self, subject: &SubjectId) -> RecordKey {
        RecordKey::new(self.agent.clone(), subject.clone(), self.schema.tag.clone())
    }
}

/// A message from the conversational counterpart.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub subject_id: SubjectId,
    pub text: String,
    /// Carried into published events for tracing.
    pub correlation_id: Option<String>,
}

impl InboundMessage {
    pub fn new(subject_id: SubjectId, text: impl Into<String>) -> Self {
        Self {
            subject_id,
            text: text.into(),
            correlation_id: None,
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }
}
