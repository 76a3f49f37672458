//! Integer price representation.
//!
//! The store sells in a currency without minor units, so a price is a whole
//! number of currency units. Cart totals are computed with checked
//! arithmetic and saturate instead of wrapping.

use core::fmt;
use core::iter::Sum;

use serde::{Deserialize, Serialize};

/// A price in whole currency units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(0);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Get the amount in whole currency units.
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Price of `quantity` units, saturating on overflow.
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as i64))
    }

    /// Sum of two prices, saturating on overflow.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

/// Formats with a currency sign and `.` thousands separators (e.g. `$78.000`).
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}${grouped}")
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(amount)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::new(0).to_string(), "$0");
        assert_eq!(Price::new(999).to_string(), "$999");
        assert_eq!(Price::new(78_000).to_string(), "$78.000");
        assert_eq!(Price::new(1_250_000).to_string(), "$1.250.000");
        assert_eq!(Price::new(-4_500).to_string(), "-$4.500");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::new(25_000).times(2), Price::new(40_000)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::new(90_000));
    }

    #[test]
    fn test_saturates_instead_of_overflowing() {
        assert_eq!(Price::new(i64::MAX).times(2), Price::new(i64::MAX));
        assert_eq!(
            Price::new(i64::MAX).saturating_add(Price::new(1)),
            Price::new(i64::MAX)
        );
    }
}
