//! Signer management for mutating calls.
//!
//! # Security
//! - Secret keys are loaded from environment variables
//! - Keys are never logged or serialized

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::blockchain::keys::{KeyPair, PublicKey, Signature};
use crate::blockchain::types::{is_valid_account_id, AccountId, BlockchainError, BlockchainResult};

/// Default environment variable holding the signer's secret key.
pub const SECRET_KEY_ENV_VAR: &str = "KEYPOM_HARNESS_SECRET_KEY";

/// An account's full-access key with local nonce tracking.
#[derive(Debug, Clone)]
pub struct Signer {
    account_id: AccountId,
    key_pair: KeyPair,
    /// Last nonce used by this signer; shared between clones.
    nonce: Arc<AtomicU64>,
}

impl Signer {
    pub fn new(account_id: impl Into<AccountId>, key_pair: KeyPair) -> BlockchainResult<Self> {
        let account_id = account_id.into();
        if !is_valid_account_id(&account_id) {
            return Err(BlockchainError::Wallet(format!(
                "Invalid account id '{}'",
                account_id
            )));
        }

        tracing::info!(
            account_id = %account_id,
            public_key = %key_pair.public_key(),
            "Signer initialized"
        );

        Ok(Self {
            account_id,
            key_pair,
            nonce: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Create a signer from a NEAR secret key string.
    pub fn from_secret_key(account_id: impl Into<AccountId>, secret_key: &str) -> BlockchainResult<Self> {
        let key_pair = KeyPair::from_secret_key(secret_key)
            .map_err(|e| BlockchainError::Wallet(format!("Invalid secret key format: {}", e)))?;
        Self::new(account_id, key_pair)
    }

    /// Load the secret key from the named environment variable.
    pub fn from_env(account_id: impl Into<AccountId>, env_var: &str) -> BlockchainResult<Self> {
        let secret_key = std::env::var(env_var).map_err(|_| {
            BlockchainError::Wallet(format!("Environment variable {} not set", env_var))
        })?;

        Self::from_secret_key(account_id, &secret_key)
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn public_key(&self) -> PublicKey {
        self.key_pair.public_key()
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        self.key_pair.sign(message)
    }

    /// Reserve the next nonce, never going below `chain_nonce + 1`.
    ///
    /// `chain_nonce` is the access key's nonce as last reported by the node.
    pub fn next_nonce(&self, chain_nonce: u64) -> u64 {
        let floor = chain_nonce.saturating_add(1);
        let mut current = self.nonce.load(Ordering::SeqCst);
        loop {
            let next = current.saturating_add(1).max(floor);
            match self
                .nonce
                .compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return next,
                Err(observed) => current = observed,
            }
        }
    }

    /// Last nonce handed out.
    pub fn current_nonce(&self) -> u64 {
        self.nonce.load(Ordering::SeqCst)
    }
}
