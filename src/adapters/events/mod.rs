//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process bus with inline or spawned dispatch

mod in_memory;

pub use in_memory::{DispatchMode, InMemoryEventBus};
