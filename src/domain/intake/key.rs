//! Record key - where a subject's progress lives.

use std::fmt;

use crate::domain::foundation::{AgentName, SubjectId};

use super::SchemaTag;

/// Typed key of one subject record: `(agent, subject, schema)`.
///
/// Records for different schemas never share a key, even for the same
/// agent and subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub agent: AgentName,
    pub subject: SubjectId,
    pub schema: SchemaTag,
}

impl RecordKey {
    pub fn new(agent: AgentName, subject: SubjectId, schema: SchemaTag) -> Self {
        Self {
            agent,
            subject,
            schema,
        }
    }

    /// Flat cache key, e.g. `intake:Joe:user_profile:user-1`.
    ///
    /// Components are escaped so no two keys collide.
    pub fn to_cache_key(&self) -> String {
        format!(
            "intake:{}:{}:{}",
            escape(self.agent.as_str()),
            escape(self.schema.as_str()),
            escape(self.subject.as_str())
        )
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.agent, self.subject, self.schema)
    }
}

fn escape(component: &str) -> String {
    component.replace('%', "%25").replace(':', "%3A")
}
