//! HTTP adapter for the intake pipeline.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, EvaluationView, MessageRequest, MessageResponse, RecordResponse};
pub use handlers::IntakeAppState;
pub use routes::intake_router;
