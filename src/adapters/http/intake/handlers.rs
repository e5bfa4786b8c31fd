//! HTTP handlers for intake endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::application::handlers::intake::{InboundMessage, IntakeSettings, MessagePipeline};
use crate::domain::foundation::SubjectId;
use crate::ports::ProgressStore;

use super::dto::{
    ErrorResponse, HealthResponse, MessageRequest, MessageResponse, RecordResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct IntakeAppState {
    pipeline: Arc<MessagePipeline>,
    store: Arc<dyn ProgressStore>,
    settings: IntakeSettings,
}

impl IntakeAppState {
    pub fn new(
        pipeline: Arc<MessagePipeline>,
        store: Arc<dyn ProgressStore>,
        settings: IntakeSettings,
    ) -> Self {
        Self {
            pipeline,
            store,
            settings,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/messages - Run extraction and render directives for one message
pub async fn post_message(
    State(state): State<IntakeAppState>,
    Json(req): Json<MessageRequest>,
) -> Response {
    let subject_id = match SubjectId::new(req.subject_id) {
        Ok(id) => id,
        Err(e) => return bad_request(e.to_string()),
    };

    let mut message = InboundMessage::new(subject_id, req.text);
    if let Some(id) = req.correlation_id {
        message = message.with_correlation_id(id);
    }

    let output = state.pipeline.handle(message).await;
    (StatusCode::OK, Json(MessageResponse::from(output))).into_response()
}

/// GET /api/subjects/:subject_id/record - Current record for one subject
pub async fn get_record(
    State(state): State<IntakeAppState>,
    Path(subject_id): Path<String>,
) -> Response {
    let subject_id = match SubjectId::new(subject_id) {
        Ok(id) => id,
        Err(e) => return bad_request(e.to_string()),
    };

    let key = state.settings.key_for(&subject_id);
    match state.store.get(&key, &state.settings.schema).await {
        Ok(record) => {
            let response = RecordResponse::new(
                key.agent.as_str(),
                key.schema.as_str(),
                subject_id.as_str(),
                &record,
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            warn!(record = %key, error = %e, "Record lookup failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::unavailable("Record store unavailable")),
            )
                .into_response()
        }
    }
}

/// GET /health
pub async fn health(State(state): State<IntakeAppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        agent: state.settings.agent.to_string(),
        schema: state.settings.schema.tag.to_string(),
    })
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(message)),
    )
        .into_response()
}
