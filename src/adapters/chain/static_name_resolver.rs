//! Fixed-table NameResolver for development and tests.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::nft::EvmAddress;
use crate::ports::{NameResolver, ResolveError};

#[derive(Debug, Clone, Default)]
pub struct StaticNameResolver {
    entries: HashMap<String, EvmAddress>,
}

impl StaticNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping; names are matched case-insensitively.
    pub fn with(mut self, name: &str, address: EvmAddress) -> Self {
        self.entries.insert(name.to_ascii_lowercase(), address);
        self
    }
}

#[async_trait]
impl NameResolver for StaticNameResolver {
    async fn resolve(&self, name: &str) -> Result<EvmAddress, ResolveError> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(name.to_string()))
    }
}
