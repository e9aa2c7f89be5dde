//! # Product Module
//!
//! A product is a client-owned account holding a single-currency balance.
//! Its balance only changes through ledger movements.

use crate::error::CoreResult;
use crate::money::CurrencyCode;
use crate::validation;
use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Institutional prefix of every account number
pub const ACCOUNT_PREFIX: &str = "320";

/// Random digits after the prefix
pub const ACCOUNT_SUFFIX_DIGITS: usize = 9;

/// Client-owned account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub client_id: String,
    /// Free-form category ("Cuenta de ahorros", "CDT", ...)
    pub product_type: String,
    pub alias: Option<String>,
    /// Globally unique, e.g. 320004512873
    pub account_number: String,
    pub currency: CurrencyCode,
    /// Never negative
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(
                f,
                "{} '{}' {} ({} {})",
                self.product_type, alias, self.account_number, self.balance, self.currency
            ),
            None => write!(
                f,
                "{} {} ({} {})",
                self.product_type, self.account_number, self.balance, self.currency
            ),
        }
    }
}

/// Validated input for product creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub product_type: String,
    pub alias: Option<String>,
    pub currency: CurrencyCode,
}

impl NewProduct {
    /// Validate raw input. `currency` defaults to COP.
    pub fn new(product_type: &str, alias: Option<&str>, currency: Option<&str>) -> CoreResult<Self> {
        let product_type = validation::validate_product_type(product_type)?;
        let alias = validation::validate_alias(alias)?;
        let currency = match currency.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => CurrencyCode::parse(code)?,
            None => CurrencyCode::cop(),
        };

        Ok(Self {
            product_type,
            alias,
            currency,
        })
    }
}

/// Generate a candidate account number: prefix + 9 zero-padded random digits.
///
/// Uniqueness is enforced by the store; callers retry on collision.
pub fn generate_account_number(prefix: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{}{:0width$}", prefix, suffix, width = ACCOUNT_SUFFIX_DIGITS)
}
