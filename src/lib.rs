//! Test harness for Keypom-style drop contracts on NEAR.

pub mod blockchain;
pub mod config;
pub mod harness;
pub mod observability;

pub use blockchain::{Account, CallContract, Contract, RpcClient, ViewContract};
pub use config::HarnessConfig;
pub use harness::{HarnessError, HarnessResult};
