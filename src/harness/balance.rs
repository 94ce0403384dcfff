//! Approximate balance-change checks.
//!
//! Gas burnt makes exact balance assertions brittle, so tests compare the
//! observed delta against an expected amount within a percentage band.

use crate::blockchain::types::Balance;

/// Inclusive band `[lower, upper]` around an expected amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToleranceBand {
    pub lower: Balance,
    pub upper: Balance,
}

impl ToleranceBand {
    /// Band of `|expected| ± |expected| / ceil(1 / precision)`, using integer division.
    ///
    /// Non-finite or non-positive precision gives a zero-width band.
    pub fn around(expected: Balance, precision: f64) -> Self {
        let range = if precision.is_finite() && precision > 0.0 {
            // Saturating cast: a vanishing precision just means a zero range.
            let divisor = (1.0 / precision).ceil() as u128;
            expected / divisor.max(1)
        } else {
            0
        };

        Self {
            lower: expected - range,
            upper: expected.saturating_add(range),
        }
    }

    pub fn contains(&self, value: Balance) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Whether the change from `before` to `after` is within `precision` of `expected`.
///
/// Direction is ignored: the absolute delta is compared against the band.
/// `precision = 0.05` accepts anything within 5% of `expected`, inclusive.
pub fn assert_balance_change(
    before: Balance,
    after: Balance,
    expected: Balance,
    precision: f64,
) -> bool {
    let band = ToleranceBand::around(expected, precision);
    let diff = before.abs_diff(after);
    let ok = band.contains(diff);
    if !ok {
        tracing::debug!(
            diff = %diff,
            lower = %band.lower,
            upper = %band.upper,
            "Balance change outside tolerance"
        );
    }
    ok
}
