//! Runtime configuration for the business services

use chrono::Duration;

/// Fallback signing secret; development only
pub const DEFAULT_JWT_SECRET: &str = "dev-secret";

/// Service configuration, built once at startup and shared by every service.
#[derive(Debug, Clone)]
pub struct BankConfig {
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub pending_session_ttl: Duration,
    /// Accepted TOTP drift, in 30-second steps either side
    pub otp_skew_steps: u8,
    pub otp_issuer: String,
    pub account_prefix: String,
    /// Default page size of a transaction listing
    pub transactions_page: u32,
    /// Attempts to draw a free account number before giving up
    pub account_number_attempts: u32,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            access_token_ttl: Duration::hours(1),
            pending_session_ttl: Duration::minutes(5),
            otp_skew_steps: 1,
            otp_issuer: "Banco 2FA".to_string(),
            account_prefix: banca_core::product::ACCOUNT_PREFIX.to_string(),
            transactions_page: 20,
            account_number_attempts: 5,
        }
    }
}

impl BankConfig {
    /// Read `JWT_SECRET` and `JWT_TTL_SECS` from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable or empty values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(secret) = lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            config.jwt_secret = secret;
        }
        if let Some(secs) = lookup("JWT_TTL_SECS")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|secs| *secs > 0)
        {
            config.access_token_ttl = Duration::seconds(secs);
        }

        config
    }

    pub fn with_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = secret.into();
        self
    }

    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    pub fn with_pending_session_ttl(mut self, ttl: Duration) -> Self {
        self.pending_session_ttl = ttl;
        self
    }

    pub fn with_account_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.account_prefix = prefix.into();
        self
    }
}
