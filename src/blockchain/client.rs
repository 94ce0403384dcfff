//! NEAR JSON-RPC client with timeout and failover.
//!
//! # Responsibilities
//! - Send JSON-RPC 2.0 requests to the configured endpoints
//! - Query chain state (contract views, access keys, accounts)
//! - Broadcast signed transactions
//! - Handle timeouts and network errors gracefully

use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::timeout;
use url::Url;
use uuid::Uuid;

use crate::blockchain::keys::PublicKey;
use crate::blockchain::types::{BlockchainError, BlockchainResult, U128};
use crate::config::BlockchainConfig;
use crate::observability::metrics;

/// Access key state as reported by `view_access_key`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessKeyView {
    pub nonce: u64,
    /// Base58 hash of the block the query was answered at.
    pub block_hash: String,
    pub block_height: u64,
}

/// Account state as reported by `view_account`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountView {
    pub amount: U128,
    pub locked: U128,
    pub code_hash: String,
    pub storage_usage: u64,
    pub block_height: u64,
}

#[derive(Debug, Deserialize)]
struct CallFunctionResult {
    result: Vec<u8>,
    #[serde(default)]
    logs: Vec<String>,
}

/// JSON-RPC client over one primary endpoint plus failovers.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    primary: Url,
    /// Tried in configured order after the primary.
    failovers: Vec<Url>,
    config: BlockchainConfig,
    timeout_duration: Duration,
}

impl RpcClient {
    /// Create a new client. Does not touch the network.
    pub fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);

        let primary: Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let mut failovers = Vec::new();

        for url_str in &config.failover_urls {
            match url_str.parse() {
                Ok(url) => failovers.push(url),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| BlockchainError::Transport(e.to_string()))?;

        tracing::debug!(
            rpc_url = %config.rpc_url,
            failovers = failovers.len(),
            timeout_secs = config.rpc_timeout_secs,
            "RPC client created"
        );

        Ok(Self {
            http,
            primary,
            failovers,
            config,
            timeout_duration,
        })
    }

    /// Issue a raw JSON-RPC call and return its `result`.
    ///
    /// Transport failures and timeouts move on to the next endpoint; a JSON-RPC
    /// error payload is returned as-is.
    pub async fn request(&self, method: &str, params: Value) -> BlockchainResult<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": Uuid::new_v4().to_string(),
            "method": method,
            "params": params,
        });

        let mut last_error = match self.send_to(0, &self.primary, method, &body).await {
            Ok(result) => return result,
            Err(e) => e,
        };
        for (i, url) in self.failovers.iter().enumerate() {
            match self.send_to(i + 1, url, method, &body).await {
                Ok(result) => return result,
                Err(e) => last_error = e,
            }
        }

        if self.failovers.is_empty() {
            Err(last_error)
        } else {
            Err(BlockchainError::Rpc(format!(
                "All RPC endpoints failed for {}: {}",
                method, last_error
            )))
        }
    }

    /// One attempt against one endpoint. The outer error is a transport failure
    /// or timeout; the inner result is whatever the node answered.
    async fn send_to(
        &self,
        endpoint_idx: usize,
        url: &Url,
        method: &str,
        body: &Value,
    ) -> Result<BlockchainResult<Value>, BlockchainError> {
        let started = Instant::now();
        let fut = async {
            let resp = self.http.post(url.clone()).json(body).send().await?;
            resp.json::<Value>().await
        };

        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(payload)) => {
                let result = unwrap_response(payload);
                metrics::record_rpc_request(method, result.is_ok(), started.elapsed());
                Ok(result)
            }
            Ok(Err(e)) => {
                metrics::record_rpc_request(method, false, started.elapsed());
                tracing::warn!(endpoint_idx, method, error = %e, "RPC transport error");
                Err(BlockchainError::Transport(e.to_string()))
            }
            Err(_) => {
                metrics::record_rpc_request(method, false, started.elapsed());
                tracing::warn!(endpoint_idx, method, "RPC timeout");
                Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
            }
        }
    }

    /// Number of configured endpoints, primary included.
    pub fn endpoint_count(&self) -> usize {
        1 + self.failovers.len()
    }

    /// Call a contract view method and return the raw result bytes.
    pub async fn view_function(
        &self,
        account_id: &str,
        method_name: &str,
        args: &[u8],
    ) -> BlockchainResult<Vec<u8>> {
        let params = json!({
            "request_type": "call_function",
            "finality": self.config.finality,
            "account_id": account_id,
            "method_name": method_name,
            "args_base64": BASE64_STANDARD.encode(args),
        });

        let result = self.request("query", params).await?;
        let call: CallFunctionResult =
            serde_json::from_value(result).map_err(|e| BlockchainError::Decode {
                method: method_name.to_string(),
                reason: e.to_string(),
            })?;

        for log in &call.logs {
            tracing::debug!(contract = %account_id, method = %method_name, log = %log, "Contract log");
        }

        Ok(call.result)
    }

    /// Fetch the nonce and reference block for an access key.
    pub async fn view_access_key(
        &self,
        account_id: &str,
        public_key: &PublicKey,
    ) -> BlockchainResult<AccessKeyView> {
        let params = json!({
            "request_type": "view_access_key",
            "finality": self.config.finality,
            "account_id": account_id,
            "public_key": public_key.to_string(),
        });

        let result = self.request("query", params).await?;
        serde_json::from_value(result).map_err(|e| BlockchainError::Decode {
            method: "view_access_key".to_string(),
            reason: e.to_string(),
        })
    }

    /// Fetch an account's balance and storage usage.
    pub async fn view_account(&self, account_id: &str) -> BlockchainResult<AccountView> {
        let params = json!({
            "request_type": "view_account",
            "finality": self.config.finality,
            "account_id": account_id,
        });

        let result = self.request("query", params).await?;
        serde_json::from_value(result).map_err(|e| BlockchainError::Decode {
            method: "view_account".to_string(),
            reason: e.to_string(),
        })
    }

    /// Submit a borsh-encoded signed transaction and wait for its final outcome.
    pub async fn broadcast_tx_commit(&self, signed_tx: &[u8]) -> BlockchainResult<Value> {
        let params = json!([BASE64_STANDARD.encode(signed_tx)]);
        self.request("broadcast_tx_commit", params).await
    }

    /// Check if the node is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.request("status", json!([])).await.is_ok()
    }

    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("endpoints", &self.endpoint_count())
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

/// Split a JSON-RPC response into its result or a typed error.
fn unwrap_response(mut payload: Value) -> BlockchainResult<Value> {
    if let Some(error) = payload.get("error").filter(|e| !e.is_null()) {
        let name = error
            .pointer("/cause/name")
            .or_else(|| error.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("UNKNOWN_ERROR")
            .to_string();
        let message = match error.get("data") {
            Some(Value::String(s)) => s.clone(),
            Some(data) if !data.is_null() => data.to_string(),
            _ => error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("no message")
                .to_string(),
        };
        return Err(BlockchainError::Handler { name, message });
    }

    let result = payload
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| BlockchainError::Rpc("Response has neither result nor error".to_string()))?;

    // Older nodes report query failures inside a successful result.
    if let Some(message) = result.get("error").and_then(Value::as_str) {
        return Err(BlockchainError::Handler {
            name: "QUERY_ERROR".to_string(),
            message: message.to_string(),
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BlockchainConfig {
        BlockchainConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 2,
            finality: "final".to_string(),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = RpcClient::new(test_config()).unwrap();
        assert_eq!(client.endpoint_count(), 1);
    }

    #[test]
    fn test_invalid_primary_url() {
        let mut config = test_config();
        config.rpc_url = "not a url".to_string();
        let err = RpcClient::new(config).unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }

    #[test]
    fn test_invalid_failover_skipped() {
        let mut config = test_config();
        config.failover_urls = vec!["::bad::".to_string(), "http://127.0.0.1:2".to_string()];
        let client = RpcClient::new(config).unwrap();
        assert_eq!(client.endpoint_count(), 2);
    }

    #[tokio::test]
    async fn test_rpc_failover_exhausted() {
        let mut config = test_config();
        config.failover_urls.push("http://127.0.0.1:2".to_string());

        let client = RpcClient::new(config).unwrap();
        let result = client.request("status", json!([])).await;
        assert!(result.unwrap_err().to_string().contains("All RPC endpoints failed"));
    }

    #[tokio::test]
    async fn test_single_endpoint_keeps_transport_error() {
        let client = RpcClient::new(test_config()).unwrap();
        let err = client.request("status", json!([])).await.unwrap_err();
        assert!(matches!(err, BlockchainError::Transport(_)), "got {:?}", err);
    }

    #[test]
    fn test_unwrap_handler_error() {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": "1",
            "error": {
                "name": "HANDLER_ERROR",
                "cause": { "name": "UNKNOWN_ACCOUNT", "info": {} },
                "code": -32000,
                "message": "Server error",
                "data": "account keypom.test.near does not exist"
            }
        });
        match unwrap_response(payload) {
            Err(BlockchainError::Handler { name, message }) => {
                assert_eq!(name, "UNKNOWN_ACCOUNT");
                assert!(message.contains("does not exist"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_unwrap_legacy_query_error() {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": "1",
            "result": { "error": "wasm execution failed", "logs": [] }
        });
        assert!(matches!(
            unwrap_response(payload),
            Err(BlockchainError::Handler { .. })
        ));
    }

    #[test]
    fn test_unwrap_result() {
        let payload = json!({ "jsonrpc": "2.0", "id": "1", "result": { "nonce": 4 } });
        assert_eq!(unwrap_response(payload).unwrap(), json!({ "nonce": 4 }));
    }
}
