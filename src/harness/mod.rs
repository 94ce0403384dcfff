//! Test-support helpers for drop contracts.
//!
//! # Data Flow
//! ```text
//! test / CLI
//!     → keys.rs     (fresh ed25519 key pairs for drops)
//!     → options.rs  (default gas / deposit)
//!     → views.rs    (batch view queries via ViewContract)
//!     → series.rs   (create_series calls via CallContract)
//!     → balance.rs  (tolerant balance-delta assertions)
//! ```

pub mod balance;
pub mod keys;
pub mod models;
pub mod options;
pub mod series;
pub mod views;

use thiserror::Error;

use crate::blockchain::types::BlockchainError;

pub use balance::{assert_balance_change, ToleranceBand};
pub use keys::{generate_key_pairs, GeneratedKeys};
pub use models::{DropId, JsonDrop, JsonKeyInfo, TokenMetadata};
pub use options::{
    default_call_options, CallOptions, DEFAULT_DEPOSIT, DEFAULT_GAS, LARGE_GAS, WALLET_GAS,
};
pub use series::{create_series, create_series_with_options};
pub use views::{query_all_view_functions, query_all_view_functions_concurrent, AllViews, ViewQuery};

/// Errors raised by the harness helpers.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    /// `create_series` got metadata and id lists of different lengths.
    #[error("Series input mismatch: {metadatas} metadatas but {ids} ids")]
    SeriesLengthMismatch { metadatas: usize, ids: usize },

    /// A `create_series` call failed; earlier calls remain applied.
    #[error("create_series #{index} (mint_id {mint_id}) failed: {source}")]
    SeriesCallFailed {
        index: usize,
        mint_id: u64,
        #[source]
        source: BlockchainError,
    },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
