//! Token metadata carried inline in the token URI.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Name and description of the token being minted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
}

impl NftMetadata {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let description = description.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if description.trim().is_empty() {
            return Err(ValidationError::empty_field("description"));
        }
        Ok(Self { name, description })
    }

    /// `data:application/json;base64,...` URI holding this metadata as JSON.
    pub fn to_data_uri(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(format!("data:application/json;base64,{}", STANDARD.encode(json)))
    }
}
