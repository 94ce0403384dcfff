//! NEAR-specific types and error definitions.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Gas units attached to a function call.
pub type Gas = u64;

/// Token amount in yoctoNEAR (10^-24 NEAR).
pub type Balance = u128;

/// NEAR account identifier (e.g. `keypom.test.near`).
pub type AccountId = String;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// HTTP transport failure talking to an endpoint.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error payload.
    #[error("RPC handler error ({name}): {message}")]
    Handler { name: String, message: String },

    /// A response could not be decoded into the expected shape.
    #[error("Failed to decode `{method}` response: {reason}")]
    Decode { method: String, reason: String },

    /// Invalid key material or key string.
    #[error("Key error: {0}")]
    Key(String),

    /// Signer could not be loaded.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Transaction was executed and failed on-chain.
    #[error("Execution failed: {0}")]
    ExecutionFailure(String),

    /// A transaction could not be borsh-encoded.
    #[error("Failed to encode {what}: {reason}")]
    Encode { what: String, reason: String },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Gas and deposit attached to a mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOptions {
    pub gas: Gas,
    pub attached_deposit: Balance,
}

impl CallOptions {
    /// Parse the string-encoded big-integer form (`"30000000000000"`, `"1000000000000000000000000"`).
    pub fn from_strs(gas: &str, attached_deposit: &str) -> BlockchainResult<Self> {
        let gas = gas.trim().parse::<Gas>().map_err(|e| BlockchainError::Decode {
            method: "gas".to_string(),
            reason: format!("'{}': {}", gas, e),
        })?;
        let attached_deposit =
            attached_deposit
                .trim()
                .parse::<Balance>()
                .map_err(|e| BlockchainError::Decode {
                    method: "attached_deposit".to_string(),
                    reason: format!("'{}': {}", attached_deposit, e),
                })?;
        Ok(Self {
            gas,
            attached_deposit,
        })
    }
}

/// A u128 carried over JSON as a decimal string, the way NEAR contracts encode balances.
///
/// Decoding also takes a bare JSON integer, since some contracts return small
/// amounts unquoted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct U128(pub u128);

impl From<u128> for U128 {
    fn from(v: u128) -> Self {
        Self(v)
    }
}

impl From<U128> for u128 {
    fn from(v: U128) -> Self {
        v.0
    }
}

impl fmt::Display for U128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for U128 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = u128;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a decimal string")
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<u128, E> {
        u128::from_str(s).map_err(|e| E::custom(format!("invalid integer string '{}': {}", s, e)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
        Ok(u128::from(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
        u128::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }
}

impl<'de> Deserialize<'de> for U128 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor).map(U128)
    }
}

/// A u64 carried over JSON as a decimal string (near-sdk `U64` and `Gas`).
///
/// Decodes from a string or a bare integer, like [`U128`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct U64(pub u64);

impl fmt::Display for U64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for U64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for U64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = deserializer.deserialize_any(DecimalVisitor)?;
        u64::try_from(v)
            .map(U64)
            .map_err(|_| de::Error::custom(format!("{} does not fit in u64", v)))
    }
}

/// Check a string against NEAR account id rules.
///
/// 2..=64 chars; dot-separated parts of `[a-z0-9]` joined by single `-` or `_`.
pub fn is_valid_account_id(account_id: &str) -> bool {
    if account_id.len() < 2 || account_id.len() > 64 {
        return false;
    }

    let mut last_was_separator = true;
    for c in account_id.chars() {
        match c {
            'a'..='z' | '0'..='9' => last_was_separator = false,
            '-' | '_' | '.' => {
                if last_was_separator {
                    return false;
                }
                last_was_separator = true;
            }
            _ => return false,
        }
    }

    !last_was_separator
}
