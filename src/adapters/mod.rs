//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - LLM provider and the field extractor built on it
//! - `chain` - JSON-RPC minter and name resolvers
//! - `events` - In-process event bus
//! - `http` - axum routes for the message pipeline
//! - `storage` - Progress stores (in-memory, Redis)

pub mod ai;
pub mod chain;
pub mod events;
pub mod http;
pub mod storage;

pub use events::InMemoryEventBus;
