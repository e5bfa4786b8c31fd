//! Name Resolver Port - `.eth` name to address.

use async_trait::async_trait;

use crate::domain::nft::EvmAddress;

/// Name resolution failures.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("name '{0}' has no address")]
    NotFound(String),

    #[error("resolver unavailable: {0}")]
    Unavailable(String),

    #[error("resolver returned invalid address for '{name}': {reason}")]
    InvalidAddress { name: String, reason: String },
}

/// Port for resolving ENS names.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<EvmAddress, ResolveError>;
}
