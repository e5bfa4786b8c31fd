//! Intake Agent - progressive structured-data collection for chat agents
//!
//! Extracts a fixed schema of fields from free-form conversation, keeps
//! partial progress per subject, and steers the agent towards whatever is
//! still missing. Completed NFT requests are minted on an EVM chain.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
