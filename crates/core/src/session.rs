//! # Session Module
//!
//! Pending sessions bridge the password step and the OTP step of a login.
//!
//! ```text
//! NoSession ──password ok──▶ PendingSession ──otp ok──▶ Authenticated
//!     ▲                            │
//!     └────── expired / consumed ──┘
//! ```

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the opaque login token (alphanumeric, ~285 bits)
pub const LOGIN_TOKEN_LEN: usize = 48;

/// A password-verified login waiting for its one-time code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSession {
    pub id: String,
    pub client_id: String,
    pub login_token: String,
    pub expires_at: DateTime<Utc>,
}

impl PendingSession {
    /// Open a new pending session for `client_id`, valid for `ttl`
    pub fn open(client_id: &str, ttl: Duration) -> Self {
        Self::open_at(client_id, ttl, Utc::now())
    }

    pub fn open_at(client_id: &str, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_id: client_id.to_string(),
            login_token: generate_login_token(),
            expires_at: now + ttl,
        }
    }

    /// Expiry is absolute; a session is dead once `now` passes `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// What the caller receives from the password step
    pub fn challenge(&self) -> LoginChallenge {
        LoginChallenge {
            login_token: self.login_token.clone(),
            expires_at: self.expires_at,
        }
    }
}

/// Token plus expiry handed back by the password step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginChallenge {
    pub login_token: String,
    pub expires_at: DateTime<Utc>,
}

fn generate_login_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(LOGIN_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_session() {
        let now = Utc::now();
        let session = PendingSession::open_at("client-1", Duration::minutes(5), now);

        assert_eq!(session.client_id, "client-1");
        assert_eq!(session.expires_at, now + Duration::minutes(5));
        assert_eq!(session.login_token.len(), LOGIN_TOKEN_LEN);
        assert!(session.login_token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = PendingSession::open("client-1", Duration::minutes(5));
        let b = PendingSession::open("client-1", Duration::minutes(5));
        assert_ne!(a.login_token, b.login_token);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let session = PendingSession::open_at("client-1", Duration::minutes(5), now);

        assert!(!session.is_expired_at(now));
        assert!(!session.is_expired_at(now + Duration::minutes(5)));
        assert!(session.is_expired_at(now + Duration::minutes(5) + Duration::seconds(1)));
    }

    #[test]
    fn test_challenge() {
        let session = PendingSession::open("client-1", Duration::minutes(5));
        let challenge = session.challenge();
        assert_eq!(challenge.login_token, session.login_token);
        assert_eq!(challenge.expires_at, session.expires_at);
    }
}
