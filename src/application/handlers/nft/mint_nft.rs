//! MintNftHandler - mints a token from collected NFT details.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::domain::nft::{EvmAddress, NftMetadata, Recipient, TxHash};
use crate::ports::{MintError, NameResolver, NftMinter, ResolveError};

/// Command to mint one token.
#[derive(Debug, Clone)]
pub struct MintNftCommand {
    /// `0x` address or `.eth` name, as the user gave it.
    pub recipient: String,
    pub name: String,
    pub description: String,
}

/// Result of a submitted mint.
#[derive(Debug, Clone)]
pub struct MintNftResult {
    pub recipient: EvmAddress,
    pub token_uri: String,
    pub tx_hash: TxHash,
}

#[derive(Debug, Error)]
pub enum MintNftError {
    #[error("invalid mint request: {0}")]
    InvalidRequest(#[from] ValidationError),

    #[error("could not resolve recipient: {0}")]
    Resolution(#[from] ResolveError),

    #[error("could not encode metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("mint failed: {0}")]
    Mint(#[from] MintError),
}

impl From<MintNftError> for DomainError {
    fn from(err: MintNftError) -> Self {
        let code = match &err {
            MintNftError::InvalidRequest(_) => ErrorCode::ValidationFailed,
            MintNftError::Resolution(_) => ErrorCode::NameResolutionFailed,
            MintNftError::Metadata(_) => ErrorCode::InternalError,
            MintNftError::Mint(_) => ErrorCode::ChainError,
        };
        DomainError::new(code, err.to_string())
    }
}

/// Resolves the recipient, then submits the mint.
///
/// A `.eth` name that cannot be resolved blocks the mint.
pub struct MintNftHandler {
    minter: Arc<dyn NftMinter>,
    resolver: Arc<dyn NameResolver>,
}

impl MintNftHandler {
    pub fn new(minter: Arc<dyn NftMinter>, resolver: Arc<dyn NameResolver>) -> Self {
        Self { minter, resolver }
    }

    pub async fn handle(&self, cmd: MintNftCommand) -> Result<MintNftResult, MintNftError> {
        let recipient = Recipient::parse(&cmd.recipient)?;
        let metadata = NftMetadata::new(cmd.name, cmd.description)?;

        let address = match recipient {
            Recipient::Address(address) => address,
            Recipient::EnsName(name) => self.resolver.resolve(&name).await?,
        };

        let token_uri = metadata.to_data_uri()?;
        let tx_hash = self.minter.mint(&address, &token_uri).await?;

        info!(recipient = %address, name = %metadata.name, tx = %tx_hash, "NFT minted");
        Ok(MintNftResult {
            recipient: address,
            token_uri,
            tx_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::chain::StaticNameResolver;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMinter {
        minted: Mutex<Vec<(EvmAddress, String)>>,
        reject: bool,
    }

    #[async_trait]
    impl NftMinter for RecordingMinter {
        async fn mint(&self, to: &EvmAddress, token_uri: &str) -> Result<TxHash, MintError> {
            if self.reject {
                return Err(MintError::Rejected {
                    code: -32000,
                    message: "insufficient funds".to_string(),
                });
            }
            self.minted
                .lock()
                .unwrap()
                .push((to.clone(), token_uri.to_string()));
            Ok(TxHash::parse(&format!("0x{}", "ab".repeat(32))).unwrap())
        }
    }

    fn wevm() -> EvmAddress {
        EvmAddress::parse("0x66f820a414680b5bcda5eeca5dea238543f42054").unwrap()
    }

    fn command(recipient: &str) -> MintNftCommand {
        MintNftCommand {
            recipient: recipient.to_string(),
            name: "Adidas Campus".to_string(),
            description: "A pair of shoes".to_string(),
        }
    }

    fn handler(minter: Arc<RecordingMinter>) -> MintNftHandler {
        MintNftHandler::new(minter, Arc::new(StaticNameResolver::new().with("wevm.eth", wevm())))
    }

    #[tokio::test]
    async fn mints_to_literal_address() {
        let minter = Arc::new(RecordingMinter::default());
        let result = handler(minter.clone())
            .handle(command("0x742d35Cc6634C0532925a3b844Bc454e4438f44e"))
            .await
            .unwrap();

        assert_eq!(result.recipient.as_str(), "0x742d35cc6634c0532925a3b844bc454e4438f44e");
        assert!(result.token_uri.starts_with("data:application/json;base64,"));
        assert_eq!(minter.minted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn resolves_ens_name_before_minting() {
        let minter = Arc::new(RecordingMinter::default());
        let result = handler(minter.clone()).handle(command("wevm.eth")).await.unwrap();

        assert_eq!(result.recipient, wevm());
        assert_eq!(minter.minted.lock().unwrap()[0].0, wevm());
    }

    #[tokio::test]
    async fn unresolvable_name_blocks_mint() {
        let minter = Arc::new(RecordingMinter::default());
        let err = handler(minter.clone()).handle(command("nobody.eth")).await.unwrap_err();

        assert!(matches!(err, MintNftError::Resolution(ResolveError::NotFound(_))));
        assert!(minter.minted.lock().unwrap().is_empty());
        assert_eq!(DomainError::from(err).code, ErrorCode::NameResolutionFailed);
    }

    #[tokio::test]
    async fn invalid_recipient_is_rejected_without_chain_calls() {
        let minter = Arc::new(RecordingMinter::default());
        let err = handler(minter.clone())
            .handle(command("221B Baker Street"))
            .await
            .unwrap_err();

        assert!(matches!(err, MintNftError::InvalidRequest(_)));
        assert!(minter.minted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn node_rejection_surfaces_as_chain_error() {
        let minter = Arc::new(RecordingMinter {
            reject: true,
            ..Default::default()
        });
        let err = handler(minter).handle(command("wevm.eth")).await.unwrap_err();

        assert_eq!(DomainError::from(err).code, ErrorCode::ChainError);
    }
}
