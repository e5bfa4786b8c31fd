//! MessagePipeline - runs evaluator and providers for one inbound message.

use std::sync::Arc;
use tracing::{info_span, Instrument};

use super::{
    CompletionSignalProvider, Evaluation, ExtractionEvaluator, InboundMessage, StatusProvider,
};

/// Directive text for the next response, plus what the evaluator did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub status: String,
    pub completion_signal: String,
    pub evaluation: Evaluation,
}

/// Runs the evaluator and both providers concurrently.
///
/// Providers read the record independently of the evaluator, so a message
/// that completes a record may still be answered with the pre-merge status.
pub struct MessagePipeline {
    evaluator: Arc<ExtractionEvaluator>,
    status: Arc<StatusProvider>,
    completion: Arc<CompletionSignalProvider>,
}

impl MessagePipeline {
    pub fn new(
        evaluator: Arc<ExtractionEvaluator>,
        status: Arc<StatusProvider>,
        completion: Arc<CompletionSignalProvider>,
    ) -> Self {
        Self {
            evaluator,
            status,
            completion,
        }
    }

    pub async fn handle(&self, message: InboundMessage) -> PipelineOutput {
        let span = info_span!("intake_message", subject = %message.subject_id);

        let evaluate = async {
            if self.evaluator.should_run(&message).await {
                self.evaluator.process(&message).await
            } else {
                Evaluation::Skipped
            }
        };

        let (evaluation, status, completion_signal) = async {
            tokio::join!(
                evaluate,
                self.status.get(&message),
                self.completion.get(&message)
            )
        }
        .instrument(span)
        .await;

        PipelineOutput {
            status,
            completion_signal,
            evaluation,
        }
    }
}
