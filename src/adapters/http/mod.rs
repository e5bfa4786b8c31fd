//! HTTP adapters - REST surface standing in for the chat runtime.

pub mod intake;

pub use intake::{intake_router, IntakeAppState};
