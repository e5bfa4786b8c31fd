//! Route configuration for intake endpoints.

use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{get_record, health, post_message, IntakeAppState};

/// Creates the intake router.
///
/// Routes:
/// - `POST /api/messages` - Evaluate a message and return directives
/// - `GET /api/subjects/:subject_id/record` - Current record
/// - `GET /health` - Liveness
pub fn intake_router(state: IntakeAppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/api/messages", post(post_message))
        .route("/api/subjects/:subject_id/record", get(get_record))
        .route("/health", get(health))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
