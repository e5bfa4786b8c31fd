//! Intake domain events.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{domain_event, AgentName, EventId, SubjectId, Timestamp};

use super::{RecordKey, SchemaTag, SubjectRecord};

/// Published once, when a merge fills the last missing field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecordCompleted {
    pub event_id: EventId,
    pub record_key: String,
    pub agent: AgentName,
    pub subject_id: SubjectId,
    pub schema: SchemaTag,
    pub fields: BTreeMap<String, String>,
    pub completed_at: Timestamp,
}

impl SubjectRecordCompleted {
    pub const EVENT_TYPE: &'static str = "intake.record_completed.v1";

    pub fn new(key: &RecordKey, record: &SubjectRecord, completed_at: Timestamp) -> Self {
        Self {
            event_id: EventId::new(),
            record_key: key.to_string(),
            agent: key.agent.clone(),
            subject_id: key.subject.clone(),
            schema: key.schema.clone(),
            fields: record
                .known_fields()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            completed_at,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

domain_event!(
    SubjectRecordCompleted,
    event_type = SubjectRecordCompleted::EVENT_TYPE,
    aggregate_id = record_key,
    aggregate_type = "SubjectRecord",
    occurred_at = completed_at,
    event_id = event_id
);
