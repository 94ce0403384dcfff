//! Default gas and deposit for contract calls.

use crate::blockchain::types::{Balance, BlockchainResult, Gas};
use crate::blockchain::units::ONE_NEAR;
use crate::config::schema::CallDefaultsConfig;

pub use crate::blockchain::types::CallOptions;

/// 30 Tgas.
pub const DEFAULT_GAS: Gas = 30_000_000_000_000;
/// 300 Tgas, the per-transaction maximum.
pub const LARGE_GAS: Gas = 300_000_000_000_000;
/// 100 Tgas, what wallets attach by default.
pub const WALLET_GAS: Gas = 100_000_000_000_000;
/// 1 NEAR.
pub const DEFAULT_DEPOSIT: Balance = ONE_NEAR;

/// Call options with `DEFAULT_GAS` / `DEFAULT_DEPOSIT` filling whatever is not given.
pub fn default_call_options(gas: Option<Gas>, attached_deposit: Option<Balance>) -> CallOptions {
    CallOptions {
        gas: gas.unwrap_or(DEFAULT_GAS),
        attached_deposit: attached_deposit.unwrap_or(DEFAULT_DEPOSIT),
    }
}

impl Default for CallOptions {
    fn default() -> Self {
        default_call_options(None, None)
    }
}

impl TryFrom<&CallDefaultsConfig> for CallOptions {
    type Error = crate::blockchain::types::BlockchainError;

    fn try_from(config: &CallDefaultsConfig) -> BlockchainResult<Self> {
        CallOptions::from_strs(&config.gas, &config.attached_deposit)
    }
}
