//! Agent identity and intake schema configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::foundation::AgentName;
use crate::domain::intake::{FieldSchema, SchemaError, SchemaTag};

use super::error::ValidationError;

/// Which agent is collecting, and what it collects.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Agent name; first component of every record key
    #[serde(default = "default_name")]
    pub name: String,

    /// Built-in schema tag (`user_profile` or `nft_request`)
    #[serde(default = "default_schema")]
    pub schema: String,

    /// YAML schema file; takes precedence over `schema`
    pub schema_path: Option<PathBuf>,

    /// Lifetime of a partial record, refreshed on every write
    #[serde(default = "default_record_ttl")]
    pub record_ttl_secs: u64,
}

impl AgentConfig {
    pub fn record_ttl(&self) -> Duration {
        Duration::from_secs(self.record_ttl_secs)
    }

    pub fn agent_name(&self) -> Result<AgentName, ValidationError> {
        AgentName::new(self.name.clone()).map_err(|_| ValidationError::InvalidAgentName)
    }

    /// Loads the configured schema, validated.
    pub fn field_schema(&self) -> Result<FieldSchema, SchemaError> {
        match &self.schema_path {
            Some(path) => FieldSchema::load(path),
            None => FieldSchema::builtin(&self.schema)
                .ok_or_else(|| SchemaError::NoFields(self.schema.clone())),
        }
    }

    /// Validate agent configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.agent_name()?;
        if self.record_ttl_secs == 0 {
            return Err(ValidationError::InvalidRecordTtl);
        }
        if self.schema_path.is_none() && FieldSchema::builtin(&self.schema).is_none() {
            return Err(ValidationError::UnknownSchema(self.schema.clone()));
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            schema: default_schema(),
            schema_path: None,
            record_ttl_secs: default_record_ttl(),
        }
    }
}

fn default_name() -> String {
    "Agent".to_string()
}

fn default_schema() -> String {
    SchemaTag::USER_PROFILE.to_string()
}

fn default_record_ttl() -> u64 {
    7 * 24 * 60 * 60
}
