//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the harness.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::blockchain::wallet::SECRET_KEY_ENV_VAR;

/// Root configuration for the harness.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    /// NEAR RPC connection settings.
    pub blockchain: BlockchainConfig,

    /// Accounts the harness talks to.
    pub contracts: ContractsConfig,

    /// Signing account for mutating calls.
    pub signer: SignerConfig,

    /// Gas and deposit attached when a call does not override them.
    pub call_defaults: CallDefaultsConfig,

    /// Pagination used by the batch view helper.
    pub views: ViewDefaultsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// NEAR JSON-RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL (sandbox listens on 3030).
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Block finality for queries (`final` or `optimistic`).
    pub finality: String,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:3030".to_string(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 10,
            finality: "final".to_string(),
        }
    }
}

/// Contract account ids.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// The drop contract queried by the batch view helper.
    pub keypom: String,

    /// NFT contract receiving `create_series` calls.
    pub nft: Option<String>,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            keypom: "keypom.test.near".to_string(),
            nft: None,
        }
    }
}

/// Signer configuration. The secret key itself is only ever read from the environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Account that signs mutating calls.
    pub account_id: Option<String>,

    /// Environment variable holding the `ed25519:...` secret key.
    pub secret_key_env: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            secret_key_env: SECRET_KEY_ENV_VAR.to_string(),
        }
    }
}

/// Default call options, string-encoded since deposits overflow TOML integers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CallDefaultsConfig {
    /// Gas in gas units.
    pub gas: String,

    /// Attached deposit in yoctoNEAR.
    pub attached_deposit: String,
}

impl Default for CallDefaultsConfig {
    fn default() -> Self {
        Self {
            gas: "30000000000000".to_string(),
            attached_deposit: "1000000000000000000000000".to_string(),
        }
    }
}

/// Pagination defaults for paged views.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewDefaultsConfig {
    pub from_index: String,
    pub limit: u64,
}

impl Default for ViewDefaultsConfig {
    fn default() -> Self {
        Self {
            from_index: "0".to_string(),
            limit: 50,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Include the event target in log lines.
    pub show_target: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_target: false,
        }
    }
}
