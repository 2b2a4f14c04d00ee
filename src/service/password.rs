use crate::config::HashingConfig;
use crate::error::DeskError;
use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    rand_core::OsRng,
};
use argon2::{Algorithm, Argon2, Params, Version};

/// Argon2id hasher for account secrets.
///
/// Every call to [`SecretHasher::hash`] draws a fresh random salt, so hashing the same
/// secret twice yields two different PHC strings that both verify.
#[derive(Clone)]
pub struct SecretHasher {
    argon: Argon2<'static>,
}

impl SecretHasher {
    pub fn new(cfg: &HashingConfig) -> Result<Self, DeskError> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| DeskError::HashParams(e.to_string()))?;
        Ok(Self {
            argon: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, secret: &str) -> Result<String, DeskError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon.hash_password(secret.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash cannot be parsed.
    /// Cost parameters are read from the stored hash, not from `self`.
    pub fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool, DeskError> {
        let parsed = PasswordHash::new(stored_hash)?;
        match self.argon.verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl std::fmt::Debug for SecretHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) fn fast_hashing() -> HashingConfig {
    HashingConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_secret_hashes_differently_and_both_verify() {
        let hasher = SecretHasher::new(&fast_hashing()).unwrap();
        let a = hasher.hash("pw1").unwrap();
        let b = hasher.hash("pw1").unwrap();

        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
        assert!(!a.contains("pw1"));
        assert!(hasher.verify("pw1", &a).unwrap());
        assert!(hasher.verify("pw1", &b).unwrap());
    }

    #[test]
    fn wrong_secret_does_not_verify() {
        let hasher = SecretHasher::new(&fast_hashing()).unwrap();
        let h = hasher.hash("pw1").unwrap();
        assert!(!hasher.verify("wrong", &h).unwrap());
        assert!(!hasher.verify("", &h).unwrap());
    }

    #[test]
    fn verification_uses_parameters_from_stored_hash() {
        let strong = SecretHasher::new(&HashingConfig {
            memory_kib: 16,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        let weak = SecretHasher::new(&fast_hashing()).unwrap();
        let h = strong.hash("pw").unwrap();
        assert!(weak.verify("pw", &h).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        let hasher = SecretHasher::new(&fast_hashing()).unwrap();
        assert!(matches!(
            hasher.verify("pw", "not-a-phc-string"),
            Err(DeskError::PasswordHash(_))
        ));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let err = SecretHasher::new(&HashingConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        })
        .unwrap_err();
        assert!(matches!(err, DeskError::HashParams(_)));
    }
}
