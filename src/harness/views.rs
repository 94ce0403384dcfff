//! Batch "query everything" over the drop contract's views.
//!
//! Filters decide which groups of views run:
//! - `key`: `get_key_balance`, `get_key_information`
//! - `drop_id`: `get_drop_information`, `get_key_supply_for_drop`,
//!   `get_keys_for_drop`, `get_nft_token_ids_for_drop`
//! - `account_id`: `get_drop_supply_for_owner`, `get_drops_for_owner`
//! - always: `get_gas_price`, `get_root_account`, `get_fees_collected`,
//!   `get_next_drop_id`, `get_key_total_supply`, `get_keys`
//!
//! Nothing ties the calls to a single block; results may straddle state changes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::blockchain::contract::ViewContract;
use crate::blockchain::types::{AccountId, BlockchainError, BlockchainResult, U128};
use crate::config::schema::ViewDefaultsConfig;
use crate::harness::models::{DropId, JsonDrop, JsonKeyInfo};

/// Which views to run and how to page them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewQuery {
    pub drop_id: Option<DropId>,
    pub key: Option<String>,
    pub from_index: Option<String>,
    pub limit: Option<u64>,
    pub account_id: Option<AccountId>,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            drop_id: None,
            key: None,
            from_index: Some("0".to_string()),
            limit: Some(50),
            account_id: None,
        }
    }
}

impl ViewQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from configured pagination defaults.
    pub fn from_config(config: &ViewDefaultsConfig) -> Self {
        Self {
            from_index: Some(config.from_index.clone()),
            limit: Some(config.limit),
            ..Self::default()
        }
    }

    pub fn drop_id(mut self, drop_id: DropId) -> Self {
        self.drop_id = Some(drop_id);
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn account_id(mut self, account_id: impl Into<AccountId>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Override pagination; `None` is sent to the contract as `null`.
    pub fn page(mut self, from_index: Option<String>, limit: Option<u64>) -> Self {
        self.from_index = from_index;
        self.limit = limit;
        self
    }

    fn paged(&self, mut args: Value) -> Value {
        args["from_index"] = json!(self.from_index);
        args["limit"] = json!(self.limit);
        args
    }
}

/// Everything `query_all_view_functions` collected. Filtered-out groups stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllViews {
    pub key_balance: Option<U128>,
    pub key_information: Option<JsonKeyInfo>,
    pub drop_information: Option<JsonDrop>,
    pub key_supply_for_drop: Option<u64>,
    pub keys_for_drop: Option<Vec<JsonKeyInfo>>,
    pub token_ids_for_drop: Option<Vec<String>>,
    pub drop_supply_for_owner: Option<u64>,
    pub drops_for_owner: Option<Vec<JsonDrop>>,
    pub gas_price: U128,
    pub root_account: String,
    pub fees_collected: U128,
    pub next_drop_id: DropId,
    pub key_total_supply: U128,
    pub keys: Vec<JsonKeyInfo>,
}

type KeyViews = (Option<U128>, Option<JsonKeyInfo>);
type DropViews = (
    Option<JsonDrop>,
    Option<u64>,
    Option<Vec<JsonKeyInfo>>,
    Option<Vec<String>>,
);
type OwnerViews = (Option<u64>, Option<Vec<JsonDrop>>);
type GlobalViews = (U128, String, U128, DropId, U128, Vec<JsonKeyInfo>);

async fn key_views<C: ViewContract>(contract: &C, query: &ViewQuery) -> BlockchainResult<KeyViews> {
    let Some(key) = &query.key else {
        return Ok((None, None));
    };
    let balance: U128 = contract.view("get_key_balance", json!({ "key": key })).await?;
    let info: Option<JsonKeyInfo> = contract
        .view("get_key_information", json!({ "key": key }))
        .await?;
    Ok((Some(balance), info))
}

async fn drop_views<C: ViewContract>(contract: &C, query: &ViewQuery) -> BlockchainResult<DropViews> {
    let Some(drop_id) = query.drop_id else {
        return Ok((None, None, None, None));
    };
    let info: Option<JsonDrop> = contract
        .view("get_drop_information", json!({ "drop_id": drop_id }))
        .await?;
    let supply: u64 = contract
        .view("get_key_supply_for_drop", json!({ "drop_id": drop_id }))
        .await?;
    let keys: Vec<JsonKeyInfo> = contract
        .view("get_keys_for_drop", query.paged(json!({ "drop_id": drop_id })))
        .await?;
    let token_ids: Option<Vec<String>> = contract
        .view("get_nft_token_ids_for_drop", query.paged(json!({ "drop_id": drop_id })))
        .await?;
    Ok((info, Some(supply), Some(keys), token_ids))
}

async fn owner_views<C: ViewContract>(contract: &C, query: &ViewQuery) -> BlockchainResult<OwnerViews> {
    let Some(account_id) = &query.account_id else {
        return Ok((None, None));
    };
    let supply: u64 = contract
        .view("get_drop_supply_for_owner", json!({ "account_id": account_id }))
        .await?;
    let drops: Vec<JsonDrop> = contract
        .view("get_drops_for_owner", query.paged(json!({ "account_id": account_id })))
        .await?;
    Ok((Some(supply), Some(drops)))
}

async fn global_views<C: ViewContract>(contract: &C, query: &ViewQuery) -> BlockchainResult<GlobalViews> {
    let gas_price: U128 = contract.view("get_gas_price", json!({})).await?;
    let root_account: String = contract.view("get_root_account", json!({})).await?;
    let fees_collected: U128 = contract.view("get_fees_collected", json!({})).await?;
    let next_drop_id: DropId = contract.view("get_next_drop_id", json!({})).await?;
    let key_total_supply: U128 = contract.view("get_key_total_supply", json!({})).await?;
    let keys: Vec<JsonKeyInfo> = contract.view("get_keys", query.paged(json!({}))).await?;
    Ok((
        gas_price,
        root_account,
        fees_collected,
        next_drop_id,
        key_total_supply,
        keys,
    ))
}

fn assemble(key: KeyViews, drop: DropViews, owner: OwnerViews, global: GlobalViews) -> AllViews {
    let (key_balance, key_information) = key;
    let (drop_information, key_supply_for_drop, keys_for_drop, token_ids_for_drop) = drop;
    let (drop_supply_for_owner, drops_for_owner) = owner;
    let (gas_price, root_account, fees_collected, next_drop_id, key_total_supply, keys) = global;

    AllViews {
        key_balance,
        key_information,
        drop_information,
        key_supply_for_drop,
        keys_for_drop,
        token_ids_for_drop,
        drop_supply_for_owner,
        drops_for_owner,
        gas_price,
        root_account,
        fees_collected,
        next_drop_id,
        key_total_supply,
        keys,
    }
}

/// Run every applicable view one after another and collect the results.
///
/// Order: key views, drop views, owner views, then the six unconditional views.
pub async fn query_all_view_functions<C: ViewContract>(
    contract: &C,
    query: &ViewQuery,
) -> BlockchainResult<AllViews> {
    tracing::debug!(
        contract = %contract.contract_id(),
        drop_id = ?query.drop_id,
        key = ?query.key,
        account_id = ?query.account_id,
        "Querying all view functions"
    );

    let key = key_views(contract, query).await?;
    let drop = drop_views(contract, query).await?;
    let owner = owner_views(contract, query).await?;
    let global = global_views(contract, query).await?;

    Ok(assemble(key, drop, owner, global))
}

/// Same calls as [`query_all_view_functions`], with the four groups in flight together.
///
/// Calls within a group stay sequential. The first error cancels the rest.
pub async fn query_all_view_functions_concurrent<C: ViewContract>(
    contract: &C,
    query: &ViewQuery,
) -> BlockchainResult<AllViews> {
    tracing::debug!(
        contract = %contract.contract_id(),
        drop_id = ?query.drop_id,
        key = ?query.key,
        account_id = ?query.account_id,
        "Querying all view functions concurrently"
    );

    let (key, drop, owner, global) = tokio::try_join!(
        key_views(contract, query),
        drop_views(contract, query),
        owner_views(contract, query),
        global_views(contract, query),
    )?;

    Ok(assemble(key, drop, owner, global))
}

impl AllViews {
    /// Pretty JSON in the camelCase shape used by the CLI.
    pub fn to_json_pretty(&self) -> BlockchainResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| BlockchainError::Decode {
            method: "all_views".to_string(),
            reason: e.to_string(),
        })
    }
}
