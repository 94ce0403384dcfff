//! Shared utilities for integration testing: an in-process mock NEAR RPC node.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use borsh::BorshDeserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use keypom_harness::blockchain::transaction::{Action, SignedTransaction};
use keypom_harness::config::BlockchainConfig;

/// Block hash reported for every query.
pub fn block_hash() -> String {
    bs58::encode([7u8; 32]).into_string()
}

#[derive(Default)]
struct MockState {
    views: HashMap<String, Value>,
    view_calls: Vec<(String, Value)>,
    transactions: Vec<SignedTransaction>,
    access_key_nonce: u64,
    fail_mint_id: Option<u64>,
}

/// Programmable NEAR JSON-RPC node answering `query`, `broadcast_tx_commit` and `status`.
#[derive(Clone, Default)]
pub struct MockNode {
    state: Arc<Mutex<MockState>>,
}

#[allow(dead_code)]
impl MockNode {
    /// Bind to an ephemeral port and serve in the background. Returns the node and its URL.
    pub async fn start() -> (Self, String) {
        let node = Self::default();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let app = Router::new()
            .route("/", post(handle))
            .with_state(node.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        (node, format!("http://{}", addr))
    }

    pub fn config(url: &str) -> BlockchainConfig {
        BlockchainConfig {
            rpc_url: url.to_string(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 5,
            finality: "final".to_string(),
        }
    }

    pub fn set_view(&self, method: &str, value: Value) {
        self.state
            .lock()
            .unwrap()
            .views
            .insert(method.to_string(), value);
    }

    pub fn set_access_key_nonce(&self, nonce: u64) {
        self.state.lock().unwrap().access_key_nonce = nonce;
    }

    /// Make `create_series` with this `mint_id` fail on-chain.
    pub fn fail_mint_id(&self, mint_id: u64) {
        self.state.lock().unwrap().fail_mint_id = Some(mint_id);
    }

    pub fn view_methods(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .view_calls
            .iter()
            .map(|(m, _)| m.clone())
            .collect()
    }

    pub fn view_args(&self, method: &str) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .view_calls
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, a)| a.clone())
    }

    pub fn transactions(&self) -> Vec<SignedTransaction> {
        self.state.lock().unwrap().transactions.clone()
    }

    fn query(&self, params: &Value) -> Result<Value, Value> {
        let mut state = self.state.lock().unwrap();
        match params["request_type"].as_str() {
            Some("call_function") => {
                let method = params["method_name"].as_str().unwrap_or_default().to_string();
                let raw = BASE64_STANDARD
                    .decode(params["args_base64"].as_str().unwrap_or_default())
                    .map_err(|e| handler_error("PARSE_ERROR", &e.to_string()))?;
                let args = if raw.is_empty() {
                    Value::Null
                } else {
                    serde_json::from_slice(&raw).unwrap_or(Value::Null)
                };
                state.view_calls.push((method.clone(), args));

                let value = state
                    .views
                    .get(&method)
                    .ok_or_else(|| handler_error("CONTRACT_EXECUTION_ERROR", "MethodNotFound"))?;
                Ok(json!({
                    "result": serde_json::to_vec(value).unwrap(),
                    "logs": [format!("view {}", method)],
                    "block_height": 1,
                    "block_hash": block_hash(),
                }))
            }
            Some("view_access_key") => Ok(json!({
                "nonce": state.access_key_nonce,
                "permission": "FullAccess",
                "block_height": 1,
                "block_hash": block_hash(),
            })),
            Some("view_account") => Ok(json!({
                "amount": "5000000000000000000000000",
                "locked": "0",
                "code_hash": "11111111111111111111111111111111",
                "storage_usage": 182,
                "block_height": 1,
                "block_hash": block_hash(),
            })),
            other => Err(handler_error(
                "UNKNOWN_REQUEST",
                &format!("unsupported request_type {:?}", other),
            )),
        }
    }

    fn broadcast(&self, params: &Value) -> Result<Value, Value> {
        let encoded = params[0].as_str().unwrap_or_default();
        let bytes = BASE64_STANDARD
            .decode(encoded)
            .map_err(|e| handler_error("PARSE_ERROR", &e.to_string()))?;
        let signed = SignedTransaction::try_from_slice(&bytes)
            .map_err(|e| handler_error("PARSE_ERROR", &e.to_string()))?;
        if !signed.verify() {
            return Err(handler_error("INVALID_TRANSACTION", "InvalidSignature"));
        }

        let mut state = self.state.lock().unwrap();
        if signed.transaction.nonce <= state.access_key_nonce {
            return Err(handler_error("INVALID_TRANSACTION", "InvalidNonce"));
        }
        state.access_key_nonce = signed.transaction.nonce;

        let failed = signed.transaction.actions.iter().any(|action| {
            let Action::FunctionCall(call) = action;
            let args: Value = serde_json::from_slice(&call.args).unwrap_or(Value::Null);
            args["mint_id"].as_u64().is_some() && args["mint_id"].as_u64() == state.fail_mint_id
        });
        state.transactions.push(signed);

        let status = if failed {
            json!({ "Failure": { "ActionError": { "index": 0, "kind": {
                "FunctionCallError": { "ExecutionError": "Smart contract panicked: series exists" }
            } } } })
        } else {
            json!({ "SuccessValue": BASE64_STANDARD.encode(b"true") })
        };

        Ok(json!({
            "status": status,
            "transaction": { "hash": bs58::encode([9u8; 32]).into_string() },
            "transaction_outcome": {},
            "receipts_outcome": [],
        }))
    }
}

fn handler_error(cause: &str, data: &str) -> Value {
    json!({
        "name": "HANDLER_ERROR",
        "cause": { "name": cause, "info": {} },
        "code": -32000,
        "message": "Server error",
        "data": data,
    })
}

async fn handle(State(node): State<MockNode>, Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let outcome = match request["method"].as_str() {
        Some("query") => node.query(&request["params"]),
        Some("broadcast_tx_commit") => node.broadcast(&request["params"]),
        Some("status") => Ok(json!({ "chain_id": "sandbox" })),
        other => Err(handler_error(
            "METHOD_NOT_FOUND",
            &format!("{:?}", other),
        )),
    };

    Json(match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(error) => json!({ "jsonrpc": "2.0", "id": id, "error": error }),
    })
}

/// A key info record in the contract's JSON shape.
#[allow(dead_code)]
pub fn key_info(drop_id: u64, key_id: u64) -> Value {
    json!({
        "drop_id": drop_id,
        "pk": format!("ed25519:{}", bs58::encode([key_id as u8; 32]).into_string()),
        "cur_key_use": 1,
        "remaining_uses": 1,
        "last_used": 0,
        "allowance": "18762630063718400000000",
        "key_id": key_id,
    })
}

/// A drop record in the contract's JSON shape.
#[allow(dead_code)]
pub fn drop_json(drop_id: u64, owner_id: &str) -> Value {
    json!({
        "drop_id": drop_id,
        "owner_id": owner_id,
        "deposit_per_use": "10000000000000000000000",
        "drop_type": "Simple",
        "config": null,
        "metadata": null,
        "registered_uses": 0,
        "required_gas": "100000000000000",
        "next_key_id": 1,
    })
}

/// Install the unconditional views plus the filtered ones with plausible values.
#[allow(dead_code)]
pub fn install_keypom_views(node: &MockNode) {
    node.set_view("get_key_balance", json!("18762630063718400000000"));
    node.set_view("get_key_information", key_info(0, 0));
    node.set_view("get_drop_information", drop_json(0, "ali.test.near"));
    node.set_view("get_key_supply_for_drop", json!(1));
    node.set_view("get_keys_for_drop", json!([key_info(0, 0)]));
    node.set_view("get_nft_token_ids_for_drop", json!(["token-1", "token-2"]));
    node.set_view("get_drop_supply_for_owner", json!(1));
    node.set_view("get_drops_for_owner", json!([drop_json(0, "ali.test.near")]));
    node.set_view("get_gas_price", json!(100000000));
    node.set_view("get_root_account", json!("test.near"));
    node.set_view("get_fees_collected", json!("0"));
    node.set_view("get_next_drop_id", json!(1));
    node.set_view("get_key_total_supply", json!("1"));
    node.set_view("get_keys", json!([key_info(0, 0)]));
}
