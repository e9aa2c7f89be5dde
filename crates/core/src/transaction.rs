//! # Transaction Module
//!
//! Immutable ledger entries. One is appended for every balance change.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

impl TransactionKind {
    /// Code stored in the `transactions.kind` column
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdraw => "WITHDRAW",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DEPOSIT" => Some(TransactionKind::Deposit),
            "WITHDRAW" => Some(TransactionKind::Withdraw),
            _ => None,
        }
    }

    /// Apply the kind's sign to a positive amount
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Deposit => amount,
            TransactionKind::Withdraw => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded movement on a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub product_id: String,
    pub kind: TransactionKind,
    /// Always positive; the sign comes from `kind`
    pub amount: Decimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Effect of this entry on the product balance
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}

/// Sum of signed effects. Equals the product balance at every observation.
pub fn net_effect<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    transactions
        .into_iter()
        .map(Transaction::signed_amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tx(kind: TransactionKind, amount: Decimal) -> Transaction {
        Transaction {
            id: "t".into(),
            product_id: "p".into(),
            kind,
            amount,
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_kind_str() {
        assert_eq!(TransactionKind::Deposit.as_str(), "DEPOSIT");
        assert_eq!(TransactionKind::from_str("withdraw"), Some(TransactionKind::Withdraw));
        assert_eq!(TransactionKind::from_str("TRANSFER"), None);
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(tx(TransactionKind::Deposit, dec!(10)).signed_amount(), dec!(10));
        assert_eq!(tx(TransactionKind::Withdraw, dec!(10)).signed_amount(), dec!(-10));
    }

    #[test]
    fn test_net_effect() {
        let history = vec![
            tx(TransactionKind::Deposit, dec!(500000)),
            tx(TransactionKind::Withdraw, dec!(120000.50)),
            tx(TransactionKind::Deposit, dec!(0.50)),
        ];
        assert_eq!(net_effect(&history), dec!(380000.00));
        assert_eq!(net_effect(std::iter::empty()), Decimal::ZERO);
    }
}
