//! Application handlers.
//!
//! Orchestrate domain operations across ports.
//!
//! - `intake` - Extraction evaluator, status and completion providers
//! - `nft` - Minting collected NFT requests

pub mod intake;
pub mod nft;

pub use intake::{
    CompletionSignalProvider, Evaluation, ExtractionEvaluator, InboundMessage, IntakeSettings,
    MessagePipeline, PipelineOutput, StatusProvider,
};
pub use nft::{MintNftCommand, MintNftError, MintNftHandler, MintNftResult, MintOnCompletion};
