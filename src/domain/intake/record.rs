//! Subject record - partial progress towards a complete schema.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StateMachine, Timestamp};

use super::{ExtractedFields, FieldSchema};

/// Whether every field of the schema is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionStatus {
    Incomplete,
    Complete,
}

impl StateMachine for CollectionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (CollectionStatus::Incomplete, CollectionStatus::Complete)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            CollectionStatus::Incomplete => vec![CollectionStatus::Complete],
            CollectionStatus::Complete => vec![],
        }
    }
}

/// One schema field and its value, if known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSlot {
    pub name: String,
    pub value: Option<String>,
}

/// What a merge changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Fields newly populated by this merge, in schema order.
    pub accepted: Vec<String>,
    pub before: CollectionStatus,
    pub after: CollectionStatus,
}

impl MergeOutcome {
    /// True when this merge changed the record.
    pub fn is_dirty(&self) -> bool {
        !self.accepted.is_empty()
    }

    /// True only for the merge that filled the last missing field.
    pub fn completed_now(&self) -> bool {
        self.before.can_transition_to(&self.after)
    }
}

/// Values collected so far for one subject, one slot per schema field.
///
/// Populated slots are never overwritten, and `last_updated` moves only when
/// a merge populates at least one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    fields: Vec<FieldSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_updated: Option<Timestamp>,
}

impl SubjectRecord {
    /// An all-empty record for the schema.
    pub fn empty(schema: &FieldSchema) -> Self {
        Self {
            fields: schema
                .field_names()
                .map(|name| FieldSlot {
                    name: name.to_string(),
                    value: None,
                })
                .collect(),
            last_updated: None,
        }
    }

    /// Re-aligns a stored record with the schema: schema order, unknown slots
    /// dropped, blank values cleared.
    pub fn conform_to(mut self, schema: &FieldSchema) -> Self {
        let fields = schema
            .field_names()
            .map(|name| {
                let value = self
                    .fields
                    .iter_mut()
                    .find(|slot| slot.name == name)
                    .and_then(|slot| slot.value.take())
                    .filter(|v| !v.trim().is_empty());
                FieldSlot {
                    name: name.to_string(),
                    value,
                }
            })
            .collect();
        Self {
            fields,
            last_updated: self.last_updated,
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|slot| slot.name == name)
            .and_then(|slot| slot.value.as_deref())
    }

    pub fn slots(&self) -> &[FieldSlot] {
        &self.fields
    }

    /// Populated fields as `(name, value)`, in schema order.
    pub fn known_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter_map(|slot| slot.value.as_deref().map(|v| (slot.name.as_str(), v)))
    }

    /// Names of unpopulated fields, in schema order.
    pub fn missing_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|slot| slot.value.is_none())
            .map(|slot| slot.name.as_str())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.fields.iter().all(|slot| slot.value.is_some())
    }

    pub fn status(&self) -> CollectionStatus {
        if self.is_complete() {
            CollectionStatus::Complete
        } else {
            CollectionStatus::Incomplete
        }
    }

    pub fn last_updated(&self) -> Option<Timestamp> {
        self.last_updated
    }

    /// Fills empty slots from `extracted`, first write wins.
    ///
    /// Stamps `last_updated = now` iff at least one slot was filled.
    pub fn merge(&mut self, extracted: &ExtractedFields, now: Timestamp) -> MergeOutcome {
        let before = self.status();
        let mut accepted = Vec::new();

        for slot in self.fields.iter_mut().filter(|slot| slot.value.is_none()) {
            if let Some(value) = extracted.get(&slot.name) {
                slot.value = Some(value.to_string());
                accepted.push(slot.name.clone());
            }
        }

        if !accepted.is_empty() {
            self.last_updated = Some(now);
        }

        MergeOutcome {
            accepted,
            before,
            after: self.status(),
        }
    }
}
