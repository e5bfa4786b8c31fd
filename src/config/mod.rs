//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `INTAKE_AGENT` prefix and
//! nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use intake_agent::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let addr = config.server.socket_addr().expect("Invalid listen address");
//! println!("Server running on {}", addr);
//! ```

mod agent;
mod ai;
mod chain;
mod error;
mod redis;
mod server;

pub use agent::AgentConfig;
pub use ai::AiConfig;
pub use chain::ChainConfig;
pub use error::{ConfigError, ValidationError};
pub use redis::RedisConfig;
pub use server::{Deployment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a development
/// setup: in-memory records, scripted extraction, minting disabled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Agent identity and schema
    #[serde(default)]
    pub agent: AgentConfig,

    /// Progress store backend
    #[serde(default)]
    pub redis: RedisConfig,

    /// Extraction model
    #[serde(default)]
    pub ai: AiConfig,

    /// NFT minting
    #[serde(default)]
    pub chain: ChainConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `INTAKE_AGENT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `INTAKE_AGENT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `INTAKE_AGENT__AGENT__SCHEMA=nft_request` -> `agent.schema = nft_request`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("INTAKE_AGENT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.agent.validate()?;
        self.redis.validate()?;
        self.ai.validate()?;
        self.chain.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "INTAKE_AGENT__AGENT__NAME",
        "INTAKE_AGENT__AGENT__SCHEMA",
        "INTAKE_AGENT__AGENT__RECORD_TTL_SECS",
        "INTAKE_AGENT__REDIS__URL",
        "INTAKE_AGENT__SERVER__HOST",
        "INTAKE_AGENT__SERVER__PORT",
        "INTAKE_AGENT__SERVER__ENVIRONMENT",
        "INTAKE_AGENT__CHAIN__RPC_URL",
        "INTAKE_AGENT__CHAIN__CHAIN_ID",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_empty_environment_yields_development_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.agent.schema, "user_profile");
        assert!(!config.redis.is_configured());
        assert!(!config.chain.is_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("INTAKE_AGENT__AGENT__NAME", "Joe");
        env::set_var("INTAKE_AGENT__AGENT__SCHEMA", "nft_request");
        env::set_var("INTAKE_AGENT__AGENT__RECORD_TTL_SECS", "3600");
        env::set_var("INTAKE_AGENT__REDIS__URL", "redis://localhost:6379");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.agent.name, "Joe");
        assert_eq!(config.agent.schema, "nft_request");
        assert_eq!(config.agent.record_ttl_secs, 3600);
        assert_eq!(config.redis.url.as_deref(), Some("redis://localhost:6379"));
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("INTAKE_AGENT__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_hostname_bind_address_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("INTAKE_AGENT__SERVER__HOST", "localhost");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidHost(_))));
    }

    #[test]
    fn test_enabled_chain_requires_contract() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("INTAKE_AGENT__CHAIN__RPC_URL", "http://localhost:8545");
        env::set_var("INTAKE_AGENT__CHAIN__CHAIN_ID", "31337");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.chain.chain_id, Some(31337));
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("CHAIN__CONTRACT"))
        ));
    }
}
