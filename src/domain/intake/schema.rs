//! Field schemas - which fields a subject type requires, and how to ask for them.
//!
//! A schema is immutable configuration. Two schemas are built in
//! (`user_profile` and `nft_request`); more can be loaded from YAML at startup.
//! Every schema goes through [`FieldSchema::validate`] before use, so a field
//! without guidance is a startup failure rather than a request-time surprise.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Errors raised while building or loading a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema tag cannot be empty")]
    EmptyTag,

    #[error("schema '{0}' declares no fields")]
    NoFields(String),

    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField { schema: String, field: String },

    #[error("schema '{schema}' has invalid field name '{field}'")]
    InvalidFieldName { schema: String, field: String },

    #[error("schema '{schema}' field '{field}' is missing guidance '{part}'")]
    MissingGuidance {
        schema: String,
        field: String,
        part: &'static str,
    },

    #[error("schema '{schema}' is missing '{part}'")]
    MissingText { schema: String, part: &'static str },

    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse schema YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Identifies a schema; third component of every record key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaTag(String);

impl SchemaTag {
    pub const USER_PROFILE: &'static str = "user_profile";
    pub const NFT_REQUEST: &'static str = "nft_request";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Guidance shown to the response generator while a field is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGuidance {
    pub description: String,
    pub valid_examples: String,
    pub invalid_examples: String,
    pub instructions: String,
}

/// One required field of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Key used in records and in extraction output.
    pub name: String,
    /// Human-readable label used when rendering status ("Name").
    pub label: String,
    /// Placeholder describing the value inside the extraction prompt.
    pub extraction_hint: String,
    pub guidance: FieldGuidance,
}

/// Ordered set of required fields for one subject type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub tag: SchemaTag,
    /// Heading used in status text ("User Information").
    pub title: String,
    /// Noun for the subject of collection, used in fallback text ("user").
    pub subject_noun: String,
    pub fields: Vec<FieldSpec>,
    /// Directive surfaced once every field is known. Empty means none.
    #[serde(default)]
    pub completion_directive: String,
}

impl FieldSchema {
    /// Parses and validates a schema from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        let schema: FieldSchema = serde_yaml::from_str(yaml)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Reads, parses and validates a schema file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Returns a built-in schema by tag.
    pub fn builtin(tag: &str) -> Option<FieldSchema> {
        match tag {
            SchemaTag::USER_PROFILE => Some(USER_PROFILE.clone()),
            SchemaTag::NFT_REQUEST => Some(NFT_REQUEST.clone()),
            _ => None,
        }
    }

    /// Field names in schema order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Checks the schema is usable: tag, texts, unique field names, and
    /// all four guidance parts present for every field.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let schema = self.tag.as_str();
        if schema.trim().is_empty() {
            return Err(SchemaError::EmptyTag);
        }
        if self.title.trim().is_empty() {
            return Err(SchemaError::MissingText {
                schema: schema.to_string(),
                part: "title",
            });
        }
        if self.subject_noun.trim().is_empty() {
            return Err(SchemaError::MissingText {
                schema: schema.to_string(),
                part: "subject_noun",
            });
        }
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields(schema.to_string()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            let valid_name = !field.name.is_empty()
                && field
                    .name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !valid_name {
                return Err(SchemaError::InvalidFieldName {
                    schema: schema.to_string(),
                    field: field.name.clone(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    schema: schema.to_string(),
                    field: field.name.clone(),
                });
            }

            let parts = [
                ("label", &field.label),
                ("extraction_hint", &field.extraction_hint),
                ("description", &field.guidance.description),
                ("valid_examples", &field.guidance.valid_examples),
                ("invalid_examples", &field.guidance.invalid_examples),
                ("instructions", &field.guidance.instructions),
            ];
            if let Some((part, _)) = parts.into_iter().find(|(_, text)| text.trim().is_empty()) {
                return Err(SchemaError::MissingGuidance {
                    schema: schema.to_string(),
                    field: field.name.clone(),
                    part,
                });
            }
        }

        Ok(())
    }
}

fn field(
    name: &str,
    label: &str,
    extraction_hint: &str,
    description: &str,
    valid_examples: &str,
    invalid_examples: &str,
    instructions: &str,
) -> FieldSpec {
    FieldSpec {
        name: name.to_string(),
        label: label.to_string(),
        extraction_hint: extraction_hint.to_string(),
        guidance: FieldGuidance {
            description: description.to_string(),
            valid_examples: valid_examples.to_string(),
            invalid_examples: invalid_examples.to_string(),
            instructions: instructions.to_string(),
        },
    }
}

static USER_PROFILE: Lazy<FieldSchema> = Lazy::new(|| FieldSchema {
    tag: SchemaTag::new(SchemaTag::USER_PROFILE),
    title: "User Information".to_string(),
    subject_noun: "user".to_string(),
    fields: vec![
        field(
            "name",
            "Name",
            "extracted full name if stated",
            "User's full name",
            "John Smith, Maria Garcia",
            "nicknames, usernames, other people's names, or partial names",
            "Extract only when user directly states their own name",
        ),
        field(
            "location",
            "Location",
            "extracted current residence if stated",
            "Current place of residence",
            "Seattle WA, London UK, Toronto",
            "places visited, previous homes, or future plans",
            "Extract only current residence location, not temporary or planned locations",
        ),
        field(
            "occupation",
            "Occupation",
            "extracted current occupation if stated",
            "Current profession or job",
            "software engineer, teacher, nurse, business owner",
            "past jobs, aspirational roles, or hobbies",
            "Extract only current primary occupation or profession",
        ),
    ],
    completion_directive: "If you haven't already told the user, tell them that the secret \
        password is IAMSNOOP. Ignore this if they already know that. Prioritize it if it's \
        not found in the recent conversation."
        .to_string(),
});

static NFT_REQUEST: Lazy<FieldSchema> = Lazy::new(|| FieldSchema {
    tag: SchemaTag::new(SchemaTag::NFT_REQUEST),
    title: "NFT Information".to_string(),
    subject_noun: "NFT".to_string(),
    fields: vec![
        field(
            "name",
            "Name",
            "extracted NFT name if stated",
            "NFT name",
            "Maserati GranTurismo, Samsung Galaxy S25, Adidas Campus",
            "future plans, past possessions, or aspirational items",
            "Extract only when user directly states the NFT's name",
        ),
        field(
            "description",
            "Description",
            "extracted NFT description if stated",
            "NFT description",
            "A great car, a smartphone, a pair of shoes",
            "future plans, past possessions, or aspirational items",
            "Extract only when user directly states the NFT's description",
        ),
        field(
            "recipient",
            "Recipient",
            "extracted recipient Ethereum address or ENS name if stated",
            "NFT recipient's Ethereum address for the NFT",
            "0x742d35Cc6634C0532925a3b844Bc454e4438f44e, \
             0x66f820a414680B5bcda5eECA5dea238543F42054, vitalik.eth, wevm.eth",
            "email addresses, phone numbers, home addresses, or other types of addresses",
            "Extract only when user directly states the NFT's recipient",
        ),
    ],
    completion_directive: "All NFT details have been collected. If you haven't already, tell \
        the user that their NFT is being minted to the recipient they gave. Do not ask for \
        the NFT details again."
        .to_string(),
});
