//! Access tokens: HS256 JWTs bound to a client id
//!
//! Stateless: verification needs only the signing secret, so every request
//! can be authorized without touching the store.

use crate::error::{BusinessError, BusinessResult};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signed token plus its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Claims of a token that passed signature and expiry checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub client_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies access tokens with one shared secret.
#[derive(Clone)]
pub struct AccessTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for AccessTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokens")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl AccessTokens {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn sign(&self, client_id: &str) -> BusinessResult<IssuedToken> {
        self.sign_at(client_id, Utc::now())
    }

    /// Sign a token as if issued at `now`
    pub fn sign_at(&self, client_id: &str, now: DateTime<Utc>) -> BusinessResult<IssuedToken> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: client_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| BusinessError::internal(format!("token signing failed: {}", e)))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature and expiry. Every failure is `InvalidToken`.
    pub fn verify(&self, token: &str) -> BusinessResult<VerifiedToken> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| BusinessError::InvalidToken)?;
        let claims = data.claims;

        let issued_at = Utc
            .timestamp_opt(claims.iat, 0)
            .single()
            .ok_or(BusinessError::InvalidToken)?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(BusinessError::InvalidToken)?;

        Ok(VerifiedToken {
            client_id: claims.sub,
            issued_at,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> AccessTokens {
        AccessTokens::new("test-secret", Duration::hours(1))
    }

    #[test]
    fn test_sign_and_verify() {
        let tokens = tokens();
        let issued = tokens.sign("client-1").unwrap();
        let verified = tokens.verify(&issued.token).unwrap();

        assert_eq!(verified.client_id, "client-1");
        assert_eq!(verified.expires_at.timestamp(), issued.expires_at.timestamp());
        assert_eq!(
            verified.expires_at - verified.issued_at,
            Duration::hours(1)
        );
    }

    #[test]
    fn test_expired_token() {
        let tokens = tokens();
        let issued = tokens
            .sign_at("client-1", Utc::now() - Duration::hours(2))
            .unwrap();

        assert!(matches!(
            tokens.verify(&issued.token),
            Err(BusinessError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let issued = tokens().sign("client-1").unwrap();
        let other = AccessTokens::new("other-secret", Duration::hours(1));

        assert!(matches!(
            other.verify(&issued.token),
            Err(BusinessError::InvalidToken)
        ));
    }

    #[test]
    fn test_tampered_token() {
        let tokens = tokens();
        let issued = tokens.sign("client-1").unwrap();
        let mut tampered = issued.token.clone();
        tampered.push('x');

        assert!(tokens.verify(&tampered).is_err());
        assert!(tokens.verify("not.a.jwt").is_err());
    }
}
