//! NFT Minter Port - submits a mint transaction.

use async_trait::async_trait;

use crate::domain::nft::{EvmAddress, TxHash};

/// Mint submission failures.
#[derive(Debug, thiserror::Error)]
pub enum MintError {
    #[error("chain RPC unavailable: {0}")]
    Unavailable(String),

    #[error("node rejected transaction ({code}): {message}")]
    Rejected { code: i64, message: String },

    #[error("unexpected RPC response: {0}")]
    InvalidResponse(String),
}

/// Port for minting a token to an already resolved address.
#[async_trait]
pub trait NftMinter: Send + Sync {
    /// Submits `mintToken(to, token_uri)` and returns the transaction hash.
    ///
    /// Returns once the node accepts the transaction; inclusion is not awaited.
    async fn mint(&self, to: &EvmAddress, token_uri: &str) -> Result<TxHash, MintError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn NftMinter) {}

    #[test]
    fn rejected_error_shows_node_code() {
        let err = MintError::Rejected {
            code: -32000,
            message: "insufficient funds".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "node rejected transaction (-32000): insufficient funds"
        );
    }
}
