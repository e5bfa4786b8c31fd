//! AI Adapters.
//!
//! ## Available Adapters
//!
//! - `AnthropicProvider` - Anthropic Claude models over the Messages API
//! - `MockAIProvider` - Scripted provider for testing
//! - `LlmFieldExtractor` - FieldExtractor built on any AIProvider

mod anthropic_provider;
mod llm_field_extractor;
mod mock_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use llm_field_extractor::{build_prompt, find_json_object, parse_completion, LlmFieldExtractor};
pub use mock_provider::MockAIProvider;
