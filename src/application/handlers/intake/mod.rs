//! Intake handlers: the evaluator that grows subject records and the
//! providers that turn them into directives.

mod evaluator;
mod pipeline;
mod providers;
mod settings;

pub use evaluator::{Evaluation, ExtractionEvaluator};
pub use pipeline::{MessagePipeline, PipelineOutput};
pub use providers::{CompletionSignalProvider, StatusProvider};
pub use settings::{InboundMessage, IntakeSettings, DEFAULT_RECORD_TTL};
