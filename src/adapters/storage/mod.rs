//! Storage Adapters
//!
//! Implementations of the ProgressStore port.
//!
//! ## Available Adapters
//!
//! - **RedisProgressStore** - Shared store with compare-and-swap merges
//! - **InMemoryProgressStore** - Process-local store (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{InMemoryProgressStore, RedisProgressStore};
//!
//! // Production: Redis
//! let store = RedisProgressStore::new(conn).with_max_merge_attempts(5);
//!
//! // Testing: in-memory
//! let store = InMemoryProgressStore::new();
//! ```

mod in_memory_progress_store;
mod redis_progress_store;

pub use in_memory_progress_store::{InMemoryProgressStore, DEFAULT_SWEEP_INTERVAL};
pub use redis_progress_store::RedisProgressStore;
