//! NameResolver backed by an HTTP resolution service.
//!
//! Expects `GET {base_url}/{name}` to answer `{"address": "0x..."}`; a 404 or
//! a null address means the name has no address record.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::domain::nft::EvmAddress;
use crate::ports::{NameResolver, ResolveError};

pub struct HttpNameResolver {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct Resolution {
    address: Option<String>,
}

impl HttpNameResolver {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResolveError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }
}

#[async_trait]
impl NameResolver for HttpNameResolver {
    async fn resolve(&self, name: &str) -> Result<EvmAddress, ResolveError> {
        let response = self
            .client
            .get(self.url_for(name))
            .send()
            .await
            .map_err(|e| ResolveError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ResolveError::NotFound(name.to_string())),
            status if !status.is_success() => {
                return Err(ResolveError::Unavailable(format!("HTTP {}", status)))
            }
            _ => {}
        }

        let body: Resolution = response
            .json()
            .await
            .map_err(|e| ResolveError::Unavailable(format!("unreadable response: {}", e)))?;
        let raw = body
            .address
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| ResolveError::NotFound(name.to_string()))?;

        let address = EvmAddress::parse(&raw).map_err(|e| ResolveError::InvalidAddress {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        debug!(name, address = %address, "Resolved name");
        Ok(address)
    }
}
