//! Password hashing capability
//!
//! The services only see [`SecretHasher`]; [`Argon2Hasher`] is the production
//! implementation (Argon2id, PHC string output with an embedded salt).

use crate::error::{BusinessError, BusinessResult};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

/// Hash and verify secrets. Implementations are CPU-bound; call them off the
/// async executor.
pub trait SecretHasher: Send + Sync {
    /// Produce an opaque, self-describing hash of `secret`
    fn hash(&self, secret: &str) -> BusinessResult<String>;

    /// Check `secret` against a hash from [`SecretHasher::hash`].
    /// A malformed stored hash verifies as `false`.
    fn verify(&self, secret: &str, hash: &str) -> bool;
}

/// Argon2id hasher
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2Hasher {
    /// Custom cost: memory in KiB, iterations, lanes
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> BusinessResult<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| BusinessError::internal(format!("argon2 params: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl SecretHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> BusinessResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| BusinessError::internal(format!("password hashing failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify(&self, secret: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        // cost parameters come from the stored hash, not from self
        self.argon2()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Hasher {
        Argon2Hasher::with_params(8, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = cheap();
        let hash = hasher.hash("password1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("password1", &hash));
        assert!(!hasher.verify("password2", &hash));
    }

    #[test]
    fn test_salted() {
        let hasher = cheap();
        assert_ne!(hasher.hash("password1").unwrap(), hasher.hash("password1").unwrap());
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        assert!(!cheap().verify("password1", "not-a-phc-string"));
    }

    #[test]
    fn test_invalid_params() {
        assert!(Argon2Hasher::with_params(8, 0, 1).is_err());
    }
}
