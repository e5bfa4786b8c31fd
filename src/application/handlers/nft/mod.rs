//! NFT handlers.

mod mint_nft;
mod mint_on_completion;

pub use mint_nft::{MintNftCommand, MintNftError, MintNftHandler, MintNftResult};
pub use mint_on_completion::MintOnCompletion;
