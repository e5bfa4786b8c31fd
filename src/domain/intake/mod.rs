//! Intake domain module.
//!
//! Incremental collection of a fixed set of fields about a conversation
//! subject. A [`FieldSchema`] names the fields and the guidance for asking
//! about them; a [`SubjectRecord`] holds what has been learned so far and only
//! ever grows, first write wins.
//!
//! # Events
//!
//! - `SubjectRecordCompleted` - Published when a merge fills the last missing field

mod directive;
mod events;
mod extraction;
mod key;
mod record;
mod schema;

pub use directive::{completion_signal, render_status, status_fallback};
pub use events::SubjectRecordCompleted;
pub use extraction::ExtractedFields;
pub use key::RecordKey;
pub use record::{CollectionStatus, FieldSlot, MergeOutcome, SubjectRecord};
pub use schema::{FieldGuidance, FieldSchema, FieldSpec, SchemaError, SchemaTag};
