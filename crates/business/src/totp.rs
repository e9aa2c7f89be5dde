//! Time-based one-time code capability (RFC 6238: SHA-1, 6 digits, 30 s step)

use crate::error::{BusinessError, BusinessResult};
use chrono::{DateTime, Utc};
use totp_rs::{Algorithm, Secret, TOTP};

pub const OTP_DIGITS: usize = 6;
pub const OTP_STEP_SECS: u64 = 30;

/// Fresh secret plus the enrollment URI an authenticator app scans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpSecret {
    pub base32: String,
    pub otpauth_url: String,
}

/// Generate secrets and verify codes against them.
pub trait OtpProvider: Send + Sync {
    fn generate_secret(&self, account: &str) -> BusinessResult<OtpSecret>;

    /// True when `code` matches `secret` at `at`, within `skew_steps` steps either side
    fn verify(&self, secret: &str, code: &str, skew_steps: u8, at: DateTime<Utc>) -> bool;
}

/// TOTP provider backed by `totp-rs`
#[derive(Debug, Clone)]
pub struct TotpProvider {
    issuer: String,
}

impl TotpProvider {
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into().replace(':', ""),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Current code for a stored secret; what the authenticator app would show
    pub fn code_at(&self, secret: &str, at: DateTime<Utc>) -> BusinessResult<String> {
        let totp = totp_for(secret, 0)
            .ok_or_else(|| BusinessError::internal("stored TOTP secret is not valid base32"))?;
        Ok(totp.generate(unix_seconds(at)))
    }
}

impl OtpProvider for TotpProvider {
    fn generate_secret(&self, account: &str) -> BusinessResult<OtpSecret> {
        let secret = Secret::generate_secret();
        let bytes = secret
            .to_bytes()
            .map_err(|e| BusinessError::internal(format!("TOTP secret: {:?}", e)))?;

        // the otpauth label format reserves ':'
        let label = format!("{} ({})", self.issuer, account).replace(':', "");
        let totp = TOTP::new(
            Algorithm::SHA1,
            OTP_DIGITS,
            1,
            OTP_STEP_SECS,
            bytes,
            Some(self.issuer.clone()),
            label,
        )
        .map_err(|e| BusinessError::internal(format!("TOTP setup: {:?}", e)))?;

        Ok(OtpSecret {
            base32: totp.get_secret_base32(),
            otpauth_url: totp.get_url(),
        })
    }

    fn verify(&self, secret: &str, code: &str, skew_steps: u8, at: DateTime<Utc>) -> bool {
        match totp_for(secret, skew_steps) {
            Some(totp) => totp.check(code, unix_seconds(at)),
            None => false,
        }
    }
}

fn totp_for(secret: &str, skew_steps: u8) -> Option<TOTP> {
    let bytes = Secret::Encoded(secret.to_string()).to_bytes().ok()?;
    Some(TOTP::new_unchecked(
        Algorithm::SHA1,
        OTP_DIGITS,
        skew_steps,
        OTP_STEP_SECS,
        bytes,
        None,
        String::new(),
    ))
}

fn unix_seconds(at: DateTime<Utc>) -> u64 {
    u64::try_from(at.timestamp()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn provider() -> TotpProvider {
        TotpProvider::new("Banco 2FA")
    }

    #[test]
    fn test_generate_secret() {
        let secret = provider().generate_secret("ana@correo.com").unwrap();

        assert!(!secret.base32.is_empty());
        assert!(secret.otpauth_url.starts_with("otpauth://totp/"));
        assert!(secret.otpauth_url.contains(&format!("secret={}", secret.base32)));
        assert!(secret.otpauth_url.contains("issuer=Banco"));
    }

    #[test]
    fn test_verify_current_code() {
        let provider = provider();
        let secret = provider.generate_secret("ana@correo.com").unwrap();
        let now = Utc::now();
        let code = provider.code_at(&secret.base32, now).unwrap();

        assert_eq!(code.len(), OTP_DIGITS);
        assert!(provider.verify(&secret.base32, &code, 1, now));
    }

    #[test]
    fn test_verify_skew_window() {
        let provider = provider();
        let secret = provider.generate_secret("ana@correo.com").unwrap();
        let now = Utc::now();
        let previous = provider
            .code_at(&secret.base32, now - Duration::seconds(OTP_STEP_SECS as i64))
            .unwrap();
        let stale = provider
            .code_at(&secret.base32, now - Duration::seconds(3 * OTP_STEP_SECS as i64))
            .unwrap();

        assert!(provider.verify(&secret.base32, &previous, 1, now));
        // three steps back falls outside a one-step window (unless codes collide)
        if stale != provider.code_at(&secret.base32, now).unwrap() && stale != previous {
            assert!(!provider.verify(&secret.base32, &stale, 1, now));
        }
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let provider = provider();
        assert!(!provider.verify("not base32 !!", "123456", 1, Utc::now()));
        assert!(provider.code_at("not base32 !!", Utc::now()).is_err());
    }

    #[test]
    fn test_colons_are_stripped() {
        let secret = TotpProvider::new("Banco: 2FA")
            .generate_secret("odd:label@correo.com")
            .unwrap();
        assert!(secret.otpauth_url.starts_with("otpauth://totp/"));
    }
}
