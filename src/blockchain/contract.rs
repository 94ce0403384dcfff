//! Contract-facing traits and their RPC-backed implementations.
//!
//! `ViewContract` is the read-only side (`contract.view(...)`), `CallContract`
//! the signing side (`account.call(...)`). Harness helpers are generic over
//! these so tests can swap in in-memory fakes.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::blockchain::client::RpcClient;
use crate::blockchain::transaction::TxBuilder;
use crate::blockchain::types::{AccountId, BlockchainError, BlockchainResult, CallOptions};
use crate::blockchain::wallet::Signer;
use crate::observability::metrics;

/// Read-only access to a deployed contract.
#[async_trait]
pub trait ViewContract: Send + Sync {
    fn contract_id(&self) -> &str;

    /// Call a view method with JSON args and return its JSON result.
    async fn view_value(&self, method: &str, args: Value) -> BlockchainResult<Value>;

    /// Call a view method and deserialize the result.
    async fn view<T>(&self, method: &str, args: Value) -> BlockchainResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let value = self.view_value(method, args).await?;
        serde_json::from_value(value).map_err(|e| BlockchainError::Decode {
            method: method.to_string(),
            reason: e.to_string(),
        })
    }
}

/// An account able to sign state-changing calls.
#[async_trait]
pub trait CallContract: Send + Sync {
    fn account_id(&self) -> &str;

    /// Sign and submit a function call on `receiver_id`.
    async fn call(
        &self,
        receiver_id: &str,
        method: &str,
        args: Value,
        options: CallOptions,
    ) -> BlockchainResult<Value>;
}

/// A contract reached through the JSON-RPC `query` endpoint.
#[derive(Debug, Clone)]
pub struct Contract {
    client: RpcClient,
    account_id: AccountId,
}

impl Contract {
    pub fn new(client: RpcClient, account_id: impl Into<AccountId>) -> Self {
        Self {
            client,
            account_id: account_id.into(),
        }
    }
}

#[async_trait]
impl ViewContract for Contract {
    fn contract_id(&self) -> &str {
        &self.account_id
    }

    async fn view_value(&self, method: &str, args: Value) -> BlockchainResult<Value> {
        metrics::record_contract_call("view", method);

        let args = serde_json::to_vec(&args).map_err(|e| BlockchainError::Decode {
            method: method.to_string(),
            reason: e.to_string(),
        })?;
        let bytes = self
            .client
            .view_function(&self.account_id, method, &args)
            .await?;

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| BlockchainError::Decode {
            method: method.to_string(),
            reason: e.to_string(),
        })
    }
}

/// A signing account backed by the JSON-RPC client.
#[derive(Debug, Clone)]
pub struct Account {
    tx: TxBuilder,
}

impl Account {
    pub fn new(client: RpcClient, signer: Signer) -> Self {
        Self {
            tx: TxBuilder::new(client, signer),
        }
    }

    /// View access to a contract through the same client.
    pub fn contract(&self, account_id: impl Into<AccountId>) -> Contract {
        Contract::new(self.tx.client().clone(), account_id)
    }
}

#[async_trait]
impl CallContract for Account {
    fn account_id(&self) -> &str {
        self.tx.signer().account_id()
    }

    async fn call(
        &self,
        receiver_id: &str,
        method: &str,
        args: Value,
        options: CallOptions,
    ) -> BlockchainResult<Value> {
        metrics::record_contract_call("call", method);
        self.tx.function_call(receiver_id, method, &args, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(Value);

    #[async_trait]
    impl ViewContract for Fixed {
        fn contract_id(&self) -> &str {
            "fixed.test.near"
        }

        async fn view_value(&self, _method: &str, _args: Value) -> BlockchainResult<Value> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_typed_view() {
        let contract = Fixed(json!(12));
        let n: u64 = contract.view("get_next_drop_id", json!({})).await.unwrap();
        assert_eq!(n, 12);
    }

    #[tokio::test]
    async fn test_typed_view_decode_error() {
        let contract = Fixed(json!("not a number"));
        let err = contract
            .view::<u64>("get_next_drop_id", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, BlockchainError::Decode { ref method, .. } if method == "get_next_drop_id"));
    }
}
