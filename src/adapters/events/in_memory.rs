//! In-process event bus.
//!
//! Delivers events to handlers registered by event type. `Inline` dispatch
//! awaits every handler before `publish` returns, which keeps tests
//! deterministic. `Spawned` dispatch hands each handler its own tokio task so
//! slow handlers (chain calls) never hold up the message pipeline.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{error, warn};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber};

/// How handlers are invoked on publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Await each handler; handler errors are returned from `publish`.
    #[default]
    Inline,
    /// Run each handler on its own task; errors are only logged.
    Spawned,
}

const DEFAULT_HISTORY: usize = 1_000;

/// In-memory event bus.
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// bus.subscribe(SubjectRecordCompleted::EVENT_TYPE, mint_handler);
/// bus.publish(envelope).await?;
/// assert!(bus.has_event(SubjectRecordCompleted::EVENT_TYPE));
/// ```
pub struct InMemoryEventBus {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
    published: RwLock<VecDeque<EventEnvelope>>,
    history_limit: usize,
    mode: DispatchMode,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            published: RwLock::new(VecDeque::new()),
            history_limit: DEFAULT_HISTORY,
            mode: DispatchMode::Inline,
        }
    }

    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Number of recent events kept for inspection.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    // === Inspection ===

    /// Recently published events, oldest first.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn has_event(&self, event_type: &str) -> bool {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|e| e.event_type == event_type)
    }

    fn record(&self, event: &EventEnvelope) {
        if self.history_limit == 0 {
            return;
        }
        let mut published = self
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        while published.len() >= self.history_limit {
            published.pop_front();
        }
        published.push_back(event.clone());
    }

    fn handlers_for(&self, event_type: &str) -> Vec<Arc<dyn EventHandler>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_type)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.record(&event);
        let handlers = self.handlers_for(&event.event_type);

        match self.mode {
            DispatchMode::Spawned => {
                for handler in handlers {
                    let event = event.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handler.handle(event).await {
                            error!(handler = handler.name(), error = %e, "Event handler failed");
                        }
                    });
                }
                Ok(())
            }
            DispatchMode::Inline => {
                let mut errors = Vec::new();
                for handler in handlers {
                    if let Err(e) = handler.handle(event.clone()).await {
                        warn!(handler = handler.name(), error = %e, "Event handler failed");
                        errors.push(format!("{}: {}", handler.name(), e));
                    }
                }

                if errors.is_empty() {
                    Ok(())
                } else {
                    Err(DomainError::new(
                        ErrorCode::InternalError,
                        format!("Handler errors: {}", errors.join(", ")),
                    ))
                }
            }
        }
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event_type.to_string())
            .or_default()
            .push(handler);
    }
}
