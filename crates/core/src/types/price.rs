//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored and transmitted as plain JSON numbers (`10`, `19.99`), but
//! held in memory as a [`Decimal`] so comparisons and formatting never suffer
//! from binary floating point drift.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product price in the store's single currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_reads_integer_and_fractional_numbers() {
        let whole: Price = serde_json::from_str("10").unwrap();
        assert_eq!(whole, Price::from_cents(1000));

        let fractional: Price = serde_json::from_str("19.99").unwrap();
        assert_eq!(fractional, Price::from_cents(1999));
    }

    #[test]
    fn test_price_writes_json_number() {
        let value = serde_json::to_value(Price::from_cents(1250)).unwrap();
        assert!(value.is_number());
        assert!((value.as_f64().unwrap() - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_cents(1000).to_string(), "$10.00");
        assert_eq!(Price::from_cents(5).to_string(), "$0.05");
    }

    #[test]
    fn test_price_ordering() {
        assert!(Price::from_cents(100) < Price::from_cents(250));
        assert!(Price::from_cents(0).is_zero());
    }
}
