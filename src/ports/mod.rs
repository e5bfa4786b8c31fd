//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Intake Ports
//!
//! - `ProgressStore` - TTL-bound persistence of partial subject records
//! - `FieldExtractor` - Free text to best-effort schema fields
//! - `AIProvider` - LLM completions backing the extractor
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events
//!
//! ## Chain Ports
//!
//! - `NftMinter` - Submits mint transactions
//! - `NameResolver` - Resolves `.eth` names to addresses

mod ai_provider;
mod event_publisher;
mod event_subscriber;
mod field_extractor;
mod name_resolver;
mod nft_minter;
mod progress_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, TokenUsage,
};
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use field_extractor::{ExtractionError, FieldExtractor};
pub use name_resolver::{NameResolver, ResolveError};
pub use nft_minter::{MintError, NftMinter};
pub use progress_store::{ProgressStore, RecordUpdater, StoreError};
