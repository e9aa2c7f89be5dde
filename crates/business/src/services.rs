//! Service context and shared result types
//!
//! The context is built once at startup and borrowed by every service; there
//! is no global state.

use crate::config::BankConfig;
use crate::identity::IdentityService;
use crate::ledger::LedgerService;
use crate::password::{Argon2Hasher, SecretHasher};
use crate::token::AccessTokens;
use crate::totp::{OtpProvider, TotpProvider};
use banca_core::Client;
use banca_persistence::Database;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Context for business operations - store handle, config and capabilities
pub struct ServiceContext {
    db: Database,
    config: BankConfig,
    hasher: Arc<dyn SecretHasher>,
    otp: Arc<dyn OtpProvider>,
    tokens: AccessTokens,
}

impl ServiceContext {
    /// Production capabilities: Argon2id hashing and RFC 6238 TOTP
    pub fn new(db: &Database, config: BankConfig) -> Self {
        let tokens = AccessTokens::new(&config.jwt_secret, config.access_token_ttl);
        Self {
            db: db.clone(),
            hasher: Arc::new(Argon2Hasher::default()),
            otp: Arc::new(TotpProvider::new(config.otp_issuer.clone())),
            tokens,
            config,
        }
    }

    /// Replace the password hasher
    pub fn with_hasher(mut self, hasher: Arc<dyn SecretHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    /// Replace the one-time code provider
    pub fn with_otp(mut self, otp: Arc<dyn OtpProvider>) -> Self {
        self.otp = otp;
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Get database pool
    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    pub fn tokens(&self) -> &AccessTokens {
        &self.tokens
    }

    pub(crate) fn hasher(&self) -> Arc<dyn SecretHasher> {
        Arc::clone(&self.hasher)
    }

    pub(crate) fn otp(&self) -> &dyn OtpProvider {
        self.otp.as_ref()
    }

    pub fn identity(&self) -> IdentityService<'_> {
        IdentityService::new(self)
    }

    pub fn ledger(&self) -> LedgerService<'_> {
        LedgerService::new(self)
    }
}

/// Outcome of a completed two-step login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedSession {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub client: Client,
}

/// Stored balance compared with the signed sum of the product's ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceCheck {
    pub product_id: String,
    pub balance: Decimal,
    pub ledger_total: Decimal,
}

impl BalanceCheck {
    pub fn is_consistent(&self) -> bool {
        self.balance == self.ledger_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_check() {
        let check = BalanceCheck {
            product_id: "p-1".into(),
            balance: dec!(100.00),
            ledger_total: dec!(100),
        };
        assert!(check.is_consistent());

        let drifted = BalanceCheck {
            ledger_total: dec!(99.99),
            ..check
        };
        assert!(!drifted.is_consistent());
    }

    #[tokio::test]
    async fn test_context_wiring() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("ctx.db").display());
        let db = Database::init(&url).await.unwrap();

        let ctx = ServiceContext::new(&db, BankConfig::default().with_jwt_secret("k"));
        assert_eq!(ctx.config().jwt_secret, "k");
        assert_eq!(ctx.tokens().ttl(), chrono::Duration::hours(1));

        let issued = ctx.tokens().sign("c-1").unwrap();
        assert_eq!(ctx.tokens().verify(&issued.token).unwrap().client_id, "c-1");
        db.close().await;
    }
}
