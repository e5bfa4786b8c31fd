//! NftMinter over Ethereum JSON-RPC.
//!
//! Sends `eth_sendTransaction` from an account the node manages, so no key
//! material ever reaches this process. Calldata is `mintToken(address,string)`
//! against the configured contract.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::info;

use crate::domain::nft::{encode_mint_token, EvmAddress, TxHash};
use crate::ports::{MintError, NftMinter};

/// Connection and contract settings for the minter.
#[derive(Debug, Clone)]
pub struct JsonRpcMinterConfig {
    pub rpc_url: String,
    pub contract: EvmAddress,
    /// Node-managed account that signs and pays for the mint.
    pub from: EvmAddress,
    pub chain_id: Option<u64>,
    pub timeout: Duration,
}

/// JSON-RPC NFT minter.
pub struct JsonRpcNftMinter {
    config: JsonRpcMinterConfig,
    client: Client,
    next_id: AtomicU64,
}

impl JsonRpcNftMinter {
    pub fn new(config: JsonRpcMinterConfig) -> Result<Self, MintError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MintError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            next_id: AtomicU64::new(1),
        })
    }

    fn request_body(&self, id: u64, to: &EvmAddress, token_uri: &str) -> Value {
        let mut tx = json!({
            "from": self.config.from.as_str(),
            "to": self.config.contract.as_str(),
            "data": encode_mint_token(to, token_uri),
        });
        if let Some(chain_id) = self.config.chain_id {
            tx["chainId"] = Value::from(format!("0x{:x}", chain_id));
        }

        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "eth_sendTransaction",
            "params": [tx],
        })
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

fn interpret(response: RpcResponse) -> Result<TxHash, MintError> {
    if let Some(error) = response.error {
        return Err(MintError::Rejected {
            code: error.code,
            message: error.message,
        });
    }
    let result = response
        .result
        .ok_or_else(|| MintError::InvalidResponse("missing result".to_string()))?;
    TxHash::parse(&result).map_err(|e| MintError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl NftMinter for JsonRpcNftMinter {
    async fn mint(&self, to: &EvmAddress, token_uri: &str) -> Result<TxHash, MintError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = self.request_body(id, to, token_uri);

        let response = self
            .client
            .post(&self.config.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MintError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(MintError::Unavailable(format!("HTTP {}: {}", status, text)));
        }

        let rpc: RpcResponse = response
            .json()
            .await
            .map_err(|e| MintError::InvalidResponse(e.to_string()))?;
        let hash = interpret(rpc)?;

        info!(to = %to, contract = %self.config.contract, tx = %hash, "Mint transaction submitted");
        Ok(hash)
    }
}
