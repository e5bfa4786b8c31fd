//! Chain configuration for minting completed NFT requests

use serde::Deserialize;
use std::time::Duration;

use crate::domain::nft::EvmAddress;

use super::error::ValidationError;

/// Minting is enabled when `rpc_url` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint of the node holding the minter account
    pub rpc_url: Option<String>,

    /// Minting contract address
    pub contract: Option<String>,

    /// Node-managed account that sends mint transactions
    pub minter_account: Option<String>,

    /// Name resolution service base URL
    pub resolver_url: Option<String>,

    pub chain_id: Option<u64>,

    /// RPC timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ChainConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn is_enabled(&self) -> bool {
        self.rpc_url.as_deref().map_or(false, |url| !url.is_empty())
    }

    pub fn contract_address(&self) -> Result<EvmAddress, ValidationError> {
        parse_address(self.contract.as_deref(), "CHAIN__CONTRACT", "contract")
    }

    pub fn minter_address(&self) -> Result<EvmAddress, ValidationError> {
        parse_address(
            self.minter_account.as_deref(),
            "CHAIN__MINTER_ACCOUNT",
            "minter account",
        )
    }

    /// Validate chain configuration; only checked when minting is enabled.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let Some(rpc_url) = self.rpc_url.as_deref().filter(|url| !url.is_empty()) else {
            return Ok(());
        };
        if !is_http_url(rpc_url) {
            return Err(ValidationError::InvalidUrl("RPC"));
        }
        if let Some(resolver) = self.resolver_url.as_deref() {
            if !is_http_url(resolver) {
                return Err(ValidationError::InvalidUrl("resolver"));
            }
        }
        self.contract_address()?;
        self.minter_address()?;
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            contract: None,
            minter_account: None,
            resolver_url: None,
            chain_id: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn parse_address(
    value: Option<&str>,
    env_name: &'static str,
    label: &'static str,
) -> Result<EvmAddress, ValidationError> {
    let value = value.ok_or(ValidationError::MissingRequired(env_name))?;
    EvmAddress::parse(value).map_err(|_| ValidationError::InvalidAddress(label))
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn default_timeout() -> u64 {
    20
}
