//! Best-effort extraction output.

use serde_json::Value;
use std::collections::BTreeMap;

use super::FieldSchema;

/// Field values an extraction pass claims to have found.
///
/// Advisory only: the record merge decides what is accepted. Construction
/// drops blank values and, via [`ExtractedFields::from_json`], keys the schema
/// does not declare.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields(BTreeMap<String, String>);

impl ExtractedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value; blank values are ignored.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds a value; blank values are ignored.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value: String = value.into();
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            self.0.insert(name.into(), trimmed.to_string());
        }
    }

    /// Keeps the string-valued entries of a JSON object that name schema fields.
    ///
    /// Anything that is not an object yields an empty result.
    pub fn from_json(value: &Value, schema: &FieldSchema) -> Self {
        let mut fields = Self::new();
        if let Some(object) = value.as_object() {
            for name in schema.field_names() {
                if let Some(text) = object.get(name).and_then(Value::as_str) {
                    fields.insert(name, text);
                }
            }
        }
        fields
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
