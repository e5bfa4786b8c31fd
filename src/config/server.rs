//! HTTP listener settings for the intake API.

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound for `request_timeout_secs`. An extraction round trip to the
/// model has to fit inside it.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Where and how the intake API listens.
///
/// `host` must be an IP literal (`0.0.0.0`, `127.0.0.1`, `::1`). Hostnames
/// such as `localhost` are rejected by [`ServerConfig::validate`] rather than
/// resolved.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Deployment,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Per-request budget applied by the router's `TimeoutLayer`.
    pub request_timeout_secs: u64,
}

/// Deployment tier. Production switches logs to JSON.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ServerConfig {
    /// Listener address built from `host` and `port`.
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        Ok(SocketAddr::new(self.bind_ip()?, self.port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Deployment::Production
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.bind_ip()?;
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }

    fn bind_ip(&self) -> Result<IpAddr, ValidationError> {
        self.host
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidHost(self.host.clone()))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Deployment::Development,
            log_level: "info,intake_agent=debug".to_string(),
            request_timeout_secs: 30,
        }
    }
}
