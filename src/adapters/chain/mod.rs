//! Chain adapters.
//!
//! - `JsonRpcNftMinter` - Mints through a node's `eth_sendTransaction`
//! - `HttpNameResolver` - Resolves `.eth` names through an HTTP service
//! - `StaticNameResolver` - Fixed name table (development/testing)

mod http_name_resolver;
mod json_rpc_minter;
mod static_name_resolver;

pub use http_name_resolver::HttpNameResolver;
pub use json_rpc_minter::{JsonRpcMinterConfig, JsonRpcNftMinter};
pub use static_name_resolver::StaticNameResolver;
