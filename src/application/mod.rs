//! Application layer - handlers coordinating domain logic and ports.

pub mod handlers;

pub use handlers::{
    CompletionSignalProvider, Evaluation, ExtractionEvaluator, InboundMessage, IntakeSettings,
    MessagePipeline, MintNftCommand, MintNftHandler, MintOnCompletion, PipelineOutput,
    StatusProvider,
};
