//! Configuration error types

use thiserror::Error;

use crate::domain::intake::SchemaError;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Field schema could not be loaded: {0}")]
    Schema(#[from] SchemaError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Server host '{0}' is not an IP address")]
    InvalidHost(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid agent name")]
    InvalidAgentName,

    #[error("Unknown built-in schema '{0}'")]
    UnknownSchema(String),

    #[error("Record TTL must be positive")]
    InvalidRecordTtl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Merge attempts must be between 1 and 50")]
    InvalidMergeAttempts,

    #[error("Invalid Anthropic API key format")]
    InvalidAnthropicKey,

    #[error("Invalid {0} URL format")]
    InvalidUrl(&'static str),

    #[error("Invalid {0} address")]
    InvalidAddress(&'static str),
}
