//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are non-negative amounts in Nigerian naira. They are
//! serialized as decimal strings (`"3500.00"`) so that persisting and
//! reloading a catalog is exact. Deserialization also accepts plain JSON
//! numbers, which is how catalogs saved by the browser storefront
//! encoded prices.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative catalog price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Currency symbol used when formatting prices for display.
    pub const SYMBOL: &'static str = "₦";

    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in kobo (hundredths of a naira).
    #[must_use]
    pub fn from_minor_units(units: u64) -> Self {
        Self(Decimal::from_i128_with_scale(i128::from(units), 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display with thousands separators, e.g. `₦150,000.00`.
    #[must_use]
    pub fn display(&self) -> String {
        let fixed = format!("{:.2}", self.0.round_dp(2));
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let digits: Vec<char> = whole.chars().collect();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, digit) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(*digit);
        }

        format!("{}{grouped}.{fraction}", Self::SYMBOL)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        let result = Price::new(Decimal::new(-1, 2));
        assert!(matches!(result, Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_accepts_zero() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_from_minor_units() {
        let price = Price::from_minor_units(350_000);
        assert_eq!(price.amount(), Decimal::new(3500, 0));
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::from_minor_units(80_000).display(), "₦800.00");
        assert_eq!(Price::from_minor_units(350_000).display(), "₦3,500.00");
        assert_eq!(Price::from_minor_units(15_000_000).display(), "₦150,000.00");
        assert_eq!(Price::from_minor_units(123_456_789).display(), "₦1,234,567.89");
        assert_eq!(Price::ZERO.display(), "₦0.00");
    }

    #[test]
    fn test_deserialize_from_number_and_string() {
        let from_number: Price = serde_json::from_str("3500").unwrap();
        let from_float: Price = serde_json::from_str("3500.5").unwrap();
        let from_string: Price = serde_json::from_str("\"3500.00\"").unwrap();

        assert_eq!(from_number, from_string);
        assert_eq!(from_float.amount(), Decimal::new(35005, 1));
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let parsed: Result<Price, _> = serde_json::from_str("-5");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Price::from_minor_units(120_000)).unwrap();
        assert_eq!(json, "\"1200.00\"");
    }
}
