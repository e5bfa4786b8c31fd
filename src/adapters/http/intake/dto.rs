//! HTTP DTOs for intake endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::intake::{Evaluation, PipelineOutput};
use crate::domain::intake::{CollectionStatus, SubjectRecord};

/// One chat message from a subject.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRequest {
    pub subject_id: String,
    pub text: String,
    #[serde(default)]
    pub correlation_id: Option<String>,
}

/// Directive text for the agent's next reply.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub status: String,
    pub completion_signal: String,
    pub evaluation: EvaluationView,
}

impl From<PipelineOutput> for MessageResponse {
    fn from(output: PipelineOutput) -> Self {
        Self {
            status: output.status,
            completion_signal: output.completion_signal,
            evaluation: output.evaluation.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EvaluationView {
    Skipped,
    NothingNew,
    Updated { accepted: Vec<String>, completed: bool },
    Failed,
}

impl From<Evaluation> for EvaluationView {
    fn from(evaluation: Evaluation) -> Self {
        match evaluation {
            Evaluation::Skipped => Self::Skipped,
            Evaluation::NothingNew => Self::NothingNew,
            Evaluation::Updated {
                accepted,
                completed,
            } => Self::Updated {
                accepted,
                completed,
            },
            Evaluation::Failed => Self::Failed,
        }
    }
}

/// A subject's record as currently stored.
#[derive(Debug, Clone, Serialize)]
pub struct RecordResponse {
    pub agent: String,
    pub schema: String,
    pub subject_id: String,
    pub status: CollectionStatus,
    pub fields: Vec<FieldView>,
    pub missing: Vec<String>,
    /// RFC 3339, absent until the first field is stored.
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub name: String,
    pub value: Option<String>,
}

impl RecordResponse {
    pub fn new(agent: &str, schema: &str, subject_id: &str, record: &SubjectRecord) -> Self {
        Self {
            agent: agent.to_string(),
            schema: schema.to_string(),
            subject_id: subject_id.to_string(),
            status: record.status(),
            fields: record
                .slots()
                .iter()
                .map(|slot| FieldView {
                    name: slot.name.clone(),
                    value: slot.value.clone(),
                })
                .collect(),
            missing: record
                .missing_fields()
                .into_iter()
                .map(str::to_string)
                .collect(),
            last_updated: record
                .last_updated()
                .map(|ts| ts.as_datetime().to_rfc3339()),
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: "SERVICE_UNAVAILABLE".to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub agent: String,
    pub schema: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::intake::{ExtractedFields, FieldSchema};

    #[test]
    fn record_response_lists_missing_fields_in_order() {
        let schema = FieldSchema::builtin("user_profile").unwrap();
        let mut record = SubjectRecord::empty(&schema);
        record.merge(&ExtractedFields::new().with("location", "Paris"), Timestamp::now());

        let response = RecordResponse::new("Joe", "user_profile", "u1", &record);

        assert_eq!(response.status, CollectionStatus::Incomplete);
        assert_eq!(response.missing, vec!["name", "occupation"]);
        assert_eq!(response.fields[1].value.as_deref(), Some("Paris"));
        assert!(response.last_updated.is_some());
    }

    #[test]
    fn evaluation_view_is_tagged() {
        let view: EvaluationView = Evaluation::Updated {
            accepted: vec!["name".to_string()],
            completed: false,
        }
        .into();
        let json = serde_json::to_value(view).unwrap();
        assert_eq!(json["outcome"], "updated");
        assert_eq!(json["accepted"][0], "name");
    }
}
