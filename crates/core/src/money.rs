//! # Money Module
//!
//! Fixed-point amounts with `rust_decimal`. Balances and movements carry two
//! fractional digits and are stored as integer minor units (cents), so the
//! store can compare them numerically.

use crate::error::{CoreError, CoreResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fractional digits kept for every amount (NUMERIC(14,2))
pub const MONEY_SCALE: u32 = 2;

/// Largest single movement accepted: 999 999 999 999.99
pub const MAX_AMOUNT_MINOR: i64 = 99_999_999_999_999;

/// Default product currency
pub const DEFAULT_CURRENCY: &str = "COP";

/// ISO-4217 style currency code (three ASCII letters, upper-cased).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse and normalise a currency code
    ///
    /// # Examples
    /// ```
    /// use banca_core::CurrencyCode;
    ///
    /// let cop = CurrencyCode::parse("cop").unwrap();
    /// assert_eq!(cop.as_str(), "COP");
    /// assert!(CurrencyCode::parse("PESO").is_err());
    /// ```
    pub fn parse(code: &str) -> CoreResult<Self> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::validation(format!(
                "currency must be 3 letters, got '{}'",
                code
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Colombian peso, the product default
    pub fn cop() -> Self {
        Self(DEFAULT_CURRENCY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::cop()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A strictly positive movement amount, already converted to minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount {
    minor: i64,
}

impl Amount {
    /// Validate a deposit/withdraw amount.
    ///
    /// Fails with `InvalidAmount` when the amount is zero or negative, has
    /// more than two fractional digits, or exceeds [`MAX_AMOUNT_MINOR`].
    pub fn new(value: Decimal) -> CoreResult<Self> {
        if value <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "amount must be greater than zero: {}",
                value
            )));
        }

        let normalized = value.normalize();
        if normalized.scale() > MONEY_SCALE {
            return Err(CoreError::InvalidAmount(format!(
                "amount supports at most {} decimals: {}",
                MONEY_SCALE, value
            )));
        }

        let minor = to_minor_units(normalized)
            .filter(|minor| *minor <= MAX_AMOUNT_MINOR)
            .ok_or_else(|| CoreError::InvalidAmount(format!("amount too large: {}", value)))?;

        Ok(Self { minor })
    }

    /// Minor units (cents)
    pub fn minor(&self) -> i64 {
        self.minor
    }

    pub fn value(&self) -> Decimal {
        from_minor_units(self.minor)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Decimal → cents. `None` if the value has sub-cent digits or overflows.
pub fn to_minor_units(value: Decimal) -> Option<i64> {
    let scaled = value.checked_mul(Decimal::ONE_HUNDRED)?;
    if scaled.fract() != Decimal::ZERO {
        return None;
    }
    scaled.to_i64()
}

/// Cents → Decimal with two fractional digits
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MONEY_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_code() {
        assert_eq!(CurrencyCode::parse("usd").unwrap().as_str(), "USD");
        assert_eq!(CurrencyCode::parse(" COP ").unwrap(), CurrencyCode::cop());
        assert_eq!(CurrencyCode::default().to_string(), "COP");

        assert!(CurrencyCode::parse("").is_err());
        assert!(CurrencyCode::parse("US").is_err());
        assert!(CurrencyCode::parse("U$D").is_err());
    }

    #[test]
    fn test_amount_accepts_positive_values() {
        assert_eq!(Amount::new(dec!(500000)).unwrap().minor(), 50_000_000);
        assert_eq!(Amount::new(dec!(0.01)).unwrap().minor(), 1);
        assert_eq!(Amount::new(dec!(10.50)).unwrap().value(), dec!(10.50));
        // trailing zeros beyond the scale are fine
        assert_eq!(Amount::new(dec!(1.2000)).unwrap().minor(), 120);
    }

    #[test]
    fn test_amount_rejects_non_positive() {
        assert!(Amount::new(dec!(0)).unwrap_err().is_invalid_amount());
        assert!(Amount::new(dec!(-5)).unwrap_err().is_invalid_amount());
    }

    #[test]
    fn test_amount_rejects_sub_cent_and_huge() {
        assert!(Amount::new(dec!(0.001)).is_err());
        assert!(Amount::new(dec!(999999999999.99)).is_ok());
        assert!(Amount::new(dec!(1000000000000)).is_err());
    }

    #[test]
    fn test_minor_unit_conversion() {
        assert_eq!(to_minor_units(dec!(12.34)), Some(1234));
        assert_eq!(to_minor_units(dec!(12.345)), None);
        assert_eq!(from_minor_units(1234), dec!(12.34));
        assert_eq!(from_minor_units(0), Decimal::ZERO);
    }
}
