//! Database schema definitions
//!
//! Row types cho sqlx mapping từ SQLite tables.
//! Schema được định nghĩa trong migrations/20261019000000_init.sql

use crate::error::PersistenceError;
use banca_core::money::from_minor_units;
use banca_core::{
    Amount, Client, CurrencyCode, PendingSession, Product, Transaction, TransactionKind,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row type cho bảng `clients`
///
/// Holds the secrets; convert to [`Client`] before anything leaves the crate
/// boundary towards callers.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClientRow {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub totp_secret: String,
    pub created_at: DateTime<Utc>,
}

/// Row type cho bảng `pending_sessions`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PendingSessionRow {
    pub id: String,
    pub client_id: String,
    pub login_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Row type cho bảng `products`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: String,
    pub client_id: String,
    pub product_type: String,
    pub alias: Option<String>,
    pub account_number: String,
    pub currency: String,
    pub balance_minor: i64, // Decimal stored as cents
    pub created_at: DateTime<Utc>,
}

/// Row type cho bảng `transactions`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TransactionRow {
    pub id: String,
    pub product_id: String,
    pub kind: String,
    pub amount_minor: i64, // Decimal stored as cents
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TransactionRow {
    /// New ledger entry for `product_id`, stamped now
    pub fn record(
        product_id: &str,
        kind: TransactionKind,
        amount: Amount,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            kind: kind.as_str().to_string(),
            amount_minor: amount.minor(),
            description,
            created_at: Utc::now(),
        }
    }
}

// === Conversion implementations ===

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

impl From<&PendingSession> for PendingSessionRow {
    fn from(session: &PendingSession) -> Self {
        Self {
            id: session.id.clone(),
            client_id: session.client_id.clone(),
            login_token: session.login_token.clone(),
            expires_at: session.expires_at,
        }
    }
}

impl From<PendingSessionRow> for PendingSession {
    fn from(row: PendingSessionRow) -> Self {
        PendingSession {
            id: row.id,
            client_id: row.client_id,
            login_token: row.login_token,
            expires_at: row.expires_at,
        }
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = PersistenceError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let currency = CurrencyCode::parse(&row.currency).map_err(|_| {
            PersistenceError::InvalidValue {
                field: "products.currency".to_string(),
                value: row.currency.clone(),
            }
        })?;
        if row.balance_minor < 0 {
            return Err(PersistenceError::InvalidValue {
                field: "products.balance_minor".to_string(),
                value: row.balance_minor.to_string(),
            });
        }

        Ok(Product {
            id: row.id,
            client_id: row.client_id,
            product_type: row.product_type,
            alias: row.alias,
            account_number: row.account_number,
            currency,
            balance: from_minor_units(row.balance_minor),
            created_at: row.created_at,
        })
    }
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = PersistenceError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let kind = TransactionKind::from_str(&row.kind)
            .ok_or_else(|| PersistenceError::invalid_enum("transactions.kind", &row.kind))?;

        Ok(Transaction {
            id: row.id,
            product_id: row.product_id,
            kind,
            amount: from_minor_units(row.amount_minor),
            description: row.description,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product_row() -> ProductRow {
        ProductRow {
            id: "p-1".into(),
            client_id: "c-1".into(),
            product_type: "Cuenta de ahorros".into(),
            alias: None,
            account_number: "320123456789".into(),
            currency: "COP".into(),
            balance_minor: 50_000_000,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_product_row_conversion() {
        let product = Product::try_from(product_row()).unwrap();
        assert_eq!(product.balance, dec!(500000.00));
        assert_eq!(product.currency, CurrencyCode::cop());
    }

    #[test]
    fn test_product_row_rejects_corrupt_values() {
        let mut row = product_row();
        row.balance_minor = -1;
        assert!(Product::try_from(row).is_err());

        let mut row = product_row();
        row.currency = "PESOS".into();
        assert!(Product::try_from(row).is_err());
    }

    #[test]
    fn test_transaction_row_record() {
        let amount = Amount::new(dec!(1500.25)).unwrap();
        let row = TransactionRow::record("p-1", TransactionKind::Withdraw, amount, None);
        assert_eq!(row.kind, "WITHDRAW");
        assert_eq!(row.amount_minor, 150_025);

        let tx = Transaction::try_from(row).unwrap();
        assert_eq!(tx.kind, TransactionKind::Withdraw);
        assert_eq!(tx.signed_amount(), dec!(-1500.25));
    }

    #[test]
    fn test_transaction_row_unknown_kind() {
        let mut row = TransactionRow::record(
            "p-1",
            TransactionKind::Deposit,
            Amount::new(dec!(1)).unwrap(),
            None,
        );
        row.kind = "TRANSFER".into();
        assert!(Transaction::try_from(row).is_err());
    }

    #[test]
    fn test_client_row_drops_secrets() {
        let row = ClientRow {
            id: "c-1".into(),
            full_name: "Ana Gómez".into(),
            email: "ana@correo.com".into(),
            password_hash: "$argon2id$...".into(),
            totp_secret: "JBSWY3DPEHPK3PXP".into(),
            created_at: Utc::now(),
        };
        let client = Client::from(row);
        assert_eq!(client.email, "ana@correo.com");
    }
}
