//! NFT domain module.
//!
//! Values needed to mint a token for a completed `nft_request` record.

mod calldata;
mod metadata;
mod values;

pub use calldata::{encode_mint_token, MINT_TOKEN_SELECTOR};
pub use metadata::NftMetadata;
pub use values::{EvmAddress, Recipient, TxHash};
