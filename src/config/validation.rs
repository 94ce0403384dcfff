//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs, account ids and string-encoded amounts
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HarnessConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use url::Url;

use crate::blockchain::types::{is_valid_account_id, CallOptions};
use crate::config::schema::HarnessConfig;

/// A single semantic problem with a config value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `blockchain.rpc_url`).
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &HarnessConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "blockchain.rpc_url", &config.blockchain.rpc_url);
    for (i, url) in config.blockchain.failover_urls.iter().enumerate() {
        check_url(&mut errors, &format!("blockchain.failover_urls[{}]", i), url);
    }

    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "blockchain.rpc_timeout_secs",
            "must be greater than 0",
        ));
    }

    if !matches!(config.blockchain.finality.as_str(), "final" | "optimistic") {
        errors.push(ValidationError::new(
            "blockchain.finality",
            format!("'{}' is not one of final, optimistic", config.blockchain.finality),
        ));
    }

    check_account(&mut errors, "contracts.keypom", &config.contracts.keypom);
    if let Some(nft) = &config.contracts.nft {
        check_account(&mut errors, "contracts.nft", nft);
    }
    if let Some(account_id) = &config.signer.account_id {
        check_account(&mut errors, "signer.account_id", account_id);
    }

    if config.signer.secret_key_env.trim().is_empty() {
        errors.push(ValidationError::new("signer.secret_key_env", "must not be empty"));
    }

    if let Err(e) = CallOptions::from_strs(
        &config.call_defaults.gas,
        &config.call_defaults.attached_deposit,
    ) {
        errors.push(ValidationError::new("call_defaults", e.to_string()));
    }

    if config.views.limit == 0 {
        errors.push(ValidationError::new("views.limit", "must be greater than 0"));
    }
    if config.views.from_index.parse::<u128>().is_err() {
        errors.push(ValidationError::new(
            "views.from_index",
            format!("'{}' is not an unsigned integer", config.views.from_index),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("'{}': {}", value, e))),
    }
}

fn check_account(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if !is_valid_account_id(value) {
        errors.push(ValidationError::new(
            field,
            format!("'{}' is not a valid account id", value),
        ));
    }
}
