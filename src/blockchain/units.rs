//! NEAR amount parsing and display.

use crate::blockchain::types::{Balance, BlockchainError, BlockchainResult};

/// yoctoNEAR per NEAR.
pub const ONE_NEAR: Balance = 1_000_000_000_000_000_000_000_000;

const NEAR_DECIMALS: usize = 24;

/// Parse a human amount into yoctoNEAR.
///
/// `"1.5 NEAR"`, `"1.5N"` and `"2 near"` are NEAR amounts; a bare integer is yocto.
pub fn parse_near_amount(input: &str) -> BlockchainResult<Balance> {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();

    let near_part = lower
        .strip_suffix("near")
        .or_else(|| lower.strip_suffix('n'))
        .map(str::trim_end);

    let Some(amount) = near_part else {
        return trimmed
            .parse::<Balance>()
            .map_err(|e| invalid(input, &e.to_string()));
    };

    let (whole, frac) = amount.split_once('.').unwrap_or((amount, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid(input, "missing digits"));
    }
    if frac.len() > NEAR_DECIMALS {
        return Err(invalid(input, "more than 24 decimal places"));
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid(input, "not a decimal number"));
    }

    let whole: Balance = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid(input, "overflow"))?
    };
    let frac: Balance = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = NEAR_DECIMALS);
        padded.parse().map_err(|_| invalid(input, "overflow"))?
    };

    whole
        .checked_mul(ONE_NEAR)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| invalid(input, "overflow"))
}

/// Format yoctoNEAR as a NEAR amount with trailing zeros trimmed (`1.5 NEAR`).
pub fn format_near(yocto: Balance) -> String {
    let whole = yocto / ONE_NEAR;
    let frac = yocto % ONE_NEAR;
    if frac == 0 {
        return format!("{} NEAR", whole);
    }
    let frac = format!("{:0>width$}", frac, width = NEAR_DECIMALS);
    format!("{}.{} NEAR", whole, frac.trim_end_matches('0'))
}

fn invalid(input: &str, reason: &str) -> BlockchainError {
    BlockchainError::Decode {
        method: "near_amount".to_string(),
        reason: format!("'{}': {}", input, reason),
    }
}
