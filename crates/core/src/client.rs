//! # Client Module
//!
//! Identity records. A [`Client`] is the sanitized view handed to callers:
//! the password hash and TOTP secret stay inside the credential store.

use crate::error::CoreResult;
use crate::validation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Registered client, without secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// UUID v4
    pub id: String,
    pub full_name: String,
    /// Always stored lower-cased
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> ({})", self.full_name, self.email, self.id)
    }
}

/// Validated registration input.
///
/// # Examples
/// ```
/// use banca_core::Registration;
///
/// let reg = Registration::new("Ana Gómez", "Ana@Correo.com", "password1").unwrap();
/// assert_eq!(reg.email, "ana@correo.com");
/// ```
#[derive(Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn new(full_name: &str, email: &str, password: &str) -> CoreResult<Self> {
        let full_name = validation::validate_full_name(full_name)?;
        let email = validation::normalize_email(email)?;
        validation::validate_password(password)?;

        Ok(Self {
            full_name,
            email,
            password: password.to_string(),
        })
    }
}

/// Authenticator-app enrollment data, returned once at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotpEnrollment {
    pub base32: String,
    pub otpauth_url: String,
}

/// Result of a successful registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredClient {
    pub client: Client,
    pub totp: TotpEnrollment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_normalizes_input() {
        let reg = Registration::new("  Ana Gómez ", " ANA@correo.com", "password1").unwrap();
        assert_eq!(reg.full_name, "Ana Gómez");
        assert_eq!(reg.email, "ana@correo.com");
        assert_eq!(reg.password, "password1");
    }

    #[test]
    fn test_registration_policy() {
        assert!(Registration::new("Al", "al@correo.com", "password1").is_err());
        assert!(Registration::new("Ana Gómez", "not-an-email", "password1").is_err());
        assert!(Registration::new("Ana Gómez", "ana@correo.com", "1234567").is_err());
    }

    #[test]
    fn test_client_display() {
        let client = Client {
            id: "c-1".into(),
            full_name: "Ana Gómez".into(),
            email: "ana@correo.com".into(),
            created_at: Utc::now(),
        };
        assert_eq!(client.to_string(), "Ana Gómez <ana@correo.com> (c-1)");
    }
}
