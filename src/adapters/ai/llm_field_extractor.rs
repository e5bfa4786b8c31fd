//! LLM-backed field extraction.
//!
//! Builds an extraction prompt from the schema's field hints, asks the
//! provider for a JSON object, and keeps the declared string fields. Models
//! like to wrap JSON in prose or code fences, so the first balanced object in
//! the completion is used.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::domain::intake::{ExtractedFields, FieldSchema};
use crate::ports::{AIProvider, CompletionRequest, ExtractionError, FieldExtractor, MessageRole};

/// Values longer than this are treated as noise rather than a field value.
pub const MAX_FIELD_CHARS: usize = 256;

/// FieldExtractor implemented on an AIProvider.
pub struct LlmFieldExtractor {
    provider: Arc<dyn AIProvider>,
    max_tokens: u32,
}

impl LlmFieldExtractor {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            max_tokens: 512,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Extraction prompt for `text` under `schema`.
pub fn build_prompt(text: &str, schema: &FieldSchema) -> String {
    let skeleton = schema
        .fields
        .iter()
        .map(|field| {
            format!(
                "  {}: {}",
                serde_json::Value::from(field.name.as_str()),
                serde_json::Value::from(field.extraction_hint.as_str())
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "Analyze the following message to extract {noun} information.\n\
         Only extract information when it is explicitly and clearly stated by the user.\n\
         \n\
         Message:\n\
         {text}\n\
         \n\
         Return a JSON object containing only the fields where information was clearly found:\n\
         {{\n{skeleton}\n}}\n\
         \n\
         Only include fields where information is explicitly stated and current.\n\
         Omit fields if information is unclear, hypothetical, in the past or future, or about others.",
        noun = schema.subject_noun,
        text = text,
        skeleton = skeleton,
    )
}

/// First balanced `{...}` in `response`, honouring string literals.
pub fn find_json_object(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in response[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&response[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses a completion into schema fields.
pub fn parse_completion(
    response: &str,
    schema: &FieldSchema,
) -> Result<ExtractedFields, ExtractionError> {
    let json = find_json_object(response)
        .ok_or_else(|| ExtractionError::Malformed("no JSON object in completion".to_string()))?;
    let mut value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ExtractionError::Malformed(e.to_string()))?;

    if let Some(object) = value.as_object_mut() {
        object.retain(|_, v| v.as_str().map_or(false, |s| s.chars().count() <= MAX_FIELD_CHARS));
    }
    Ok(ExtractedFields::from_json(&value, schema))
}

#[async_trait]
impl FieldExtractor for LlmFieldExtractor {
    async fn extract(
        &self,
        text: &str,
        schema: &FieldSchema,
    ) -> Result<ExtractedFields, ExtractionError> {
        let request = CompletionRequest::new()
            .with_message(MessageRole::User, build_prompt(text, schema))
            .with_max_tokens(self.max_tokens)
            .with_temperature(0.0);

        let completion = self.provider.complete(request).await?;
        let fields = parse_completion(&completion.content, schema)?;

        debug!(
            schema = %schema.tag,
            provider = %self.provider.provider_info().name,
            found = fields.len(),
            "Extraction completed"
        );
        Ok(fields)
    }
}
