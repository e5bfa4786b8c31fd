//! Field Extractor Port - free text in, best-effort fields out.

use async_trait::async_trait;

use crate::domain::intake::{ExtractedFields, FieldSchema};

use super::AIError;

/// Why an extraction round produced nothing.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("extraction provider failed: {0}")]
    Provider(#[from] AIError),

    #[error("malformed extraction output: {0}")]
    Malformed(String),
}

/// Extracts schema fields the speaker stated about themselves.
///
/// Output is advisory. Missing keys mean "not found", and callers treat any
/// error as an empty round.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    async fn extract(
        &self,
        text: &str,
        schema: &FieldSchema,
    ) -> Result<ExtractedFields, ExtractionError>;
}
