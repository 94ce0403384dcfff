//! Contract view and call payloads.
//!
//! These mirror the JSON the drop and NFT contracts exchange. Fields the
//! harness does not interpret are kept as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blockchain::types::{AccountId, U128, U64};

/// Numeric drop identifier.
pub type DropId = u64;

/// A key as reported by `get_key_information` / `get_keys`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonKeyInfo {
    pub drop_id: DropId,
    pub pk: String,
    pub cur_key_use: u64,
    pub remaining_uses: u64,
    pub last_used: u64,
    pub allowance: U128,
    pub key_id: u64,
}

/// A drop as reported by `get_drop_information` / `get_drops_for_owner`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonDrop {
    pub drop_id: DropId,
    pub owner_id: AccountId,
    pub deposit_per_use: U128,
    /// Simple / NFT / FT / function-call payload, passed through untouched.
    pub drop_type: Value,
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(default)]
    pub metadata: Option<String>,
    pub registered_uses: u64,
    #[serde(default)]
    pub required_gas: Option<U64>,
    pub next_key_id: u64,
}

/// NEP-177 token metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copies: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_hash: Option<String>,
}
