//! NEAR blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (secret key) + config (RPC URL)
//!     → wallet.rs (key loading, nonce tracking)
//!     → client.rs (JSON-RPC with timeouts and failover)
//!     → transaction.rs (build, sign, broadcast, decode outcome)
//!     → contract.rs (ViewContract / CallContract seams used by the harness)
//! ```
//!
//! # Security Constraints
//! - Secret keys ONLY from environment variables
//! - Never log secret keys
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contract;
pub mod keys;
pub mod transaction;
pub mod types;
pub mod units;
pub mod wallet;

pub use client::RpcClient;
pub use contract::{Account, CallContract, Contract, ViewContract};
pub use keys::{KeyPair, PublicKey};
pub use types::{
    AccountId, Balance, BlockchainError, BlockchainResult, CallOptions, Gas, U128, U64,
};
pub use wallet::Signer;
