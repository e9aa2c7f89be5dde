//! Input policy shared by every entry point.
//!
//! Limits mirror the request schemas the service has always enforced:
//! names of at least 3 characters, passwords of at least 8, 6-digit codes.

use crate::error::{CoreError, CoreResult};
use regex::Regex;
use std::sync::LazyLock;

pub const MIN_FULL_NAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const OTP_CODE_LEN: usize = 6;
pub const MIN_ALIAS_LEN: usize = 3;
pub const MAX_ALIAS_LEN: usize = 40;
pub const MAX_DESCRIPTION_LEN: usize = 120;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Trim and lower-case an email, rejecting malformed addresses
pub fn normalize_email(email: &str) -> CoreResult<String> {
    let email = email.trim();
    if !EMAIL_RE.is_match(email) {
        return Err(CoreError::validation(format!("malformed email '{}'", email)));
    }
    Ok(email.to_lowercase())
}

pub fn validate_full_name(name: &str) -> CoreResult<String> {
    let name = name.trim();
    if name.chars().count() < MIN_FULL_NAME_LEN {
        return Err(CoreError::validation("full name is too short"));
    }
    Ok(name.to_string())
}

/// Password policy for registration. Passwords are never trimmed.
pub fn validate_password(password: &str) -> CoreResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::validation(format!(
            "password must have at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// One-time codes are exactly six ASCII digits
pub fn validate_otp_code(code: &str) -> CoreResult<()> {
    if code.len() != OTP_CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::validation("code must have 6 digits"));
    }
    Ok(())
}

pub fn validate_product_type(product_type: &str) -> CoreResult<String> {
    let product_type = product_type.trim();
    if product_type.is_empty() {
        return Err(CoreError::validation("product type is required"));
    }
    Ok(product_type.to_string())
}

/// Optional alias; blank input counts as absent
pub fn validate_alias(alias: Option<&str>) -> CoreResult<Option<String>> {
    let Some(alias) = alias.map(str::trim).filter(|a| !a.is_empty()) else {
        return Ok(None);
    };
    let len = alias.chars().count();
    if !(MIN_ALIAS_LEN..=MAX_ALIAS_LEN).contains(&len) {
        return Err(CoreError::validation(format!(
            "alias must have between {} and {} characters",
            MIN_ALIAS_LEN, MAX_ALIAS_LEN
        )));
    }
    Ok(Some(alias.to_string()))
}

pub fn validate_description(description: Option<&str>) -> CoreResult<Option<String>> {
    let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::validation("description is too long"));
    }
    Ok(Some(description.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Ana@Correo.COM ").unwrap(),
            "ana@correo.com"
        );
        assert!(normalize_email("ana").is_err());
        assert!(normalize_email("ana@correo").is_err());
        assert!(normalize_email("ana @correo.com").is_err());
        assert!(normalize_email("").is_err());
    }

    #[test]
    fn test_full_name_and_password() {
        assert_eq!(validate_full_name(" Ana Gómez ").unwrap(), "Ana Gómez");
        assert!(validate_full_name("Al").is_err());
        // counted in characters, not bytes
        assert!(validate_full_name("Óé").is_err());

        assert!(validate_password("password1").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_otp_code() {
        assert!(validate_otp_code("123456").is_ok());
        assert!(validate_otp_code("12345").is_err());
        assert!(validate_otp_code("12345a").is_err());
        assert!(validate_otp_code("1234567").is_err());
    }

    #[test]
    fn test_product_fields() {
        assert_eq!(
            validate_product_type(" Cuenta de ahorros ").unwrap(),
            "Cuenta de ahorros"
        );
        assert!(validate_product_type("   ").is_err());

        assert_eq!(validate_alias(None).unwrap(), None);
        assert_eq!(validate_alias(Some(" ")).unwrap(), None);
        assert_eq!(validate_alias(Some("Viajes")).unwrap(), Some("Viajes".into()));
        assert!(validate_alias(Some("ab")).is_err());
        assert!(validate_alias(Some(&"x".repeat(41))).is_err());
    }

    #[test]
    fn test_description() {
        assert_eq!(validate_description(Some("Nómina")).unwrap(), Some("Nómina".into()));
        assert_eq!(validate_description(None).unwrap(), None);
        assert!(validate_description(Some(&"d".repeat(121))).is_err());
    }
}
