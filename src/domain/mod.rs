//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, events, errors)
//! - `intake` - Field schemas, subject records and status rendering
//! - `nft` - Mint request values (recipients, addresses, metadata, calldata)

pub mod foundation;
pub mod intake;
pub mod nft;
