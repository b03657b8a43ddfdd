//! Password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::config::PasswordConfig;
use crate::errors::Error;

/// Argon2 hashing parameters.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Argon2Params {
    /// Create Argon2 instance with these parameters.
    fn to_argon2(self) -> Result<Argon2<'static>, Error> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None).map_err(|e| Error::Internal {
            operation: format!("create argon2 params: {e}"),
        })?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 19456, // 19 MB
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl From<&PasswordConfig> for Argon2Params {
    fn from(config: &PasswordConfig) -> Self {
        Self {
            memory_kib: config.argon2_memory_kib,
            iterations: config.argon2_iterations,
            parallelism: config.argon2_parallelism,
        }
    }
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str, params: Argon2Params) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = params.to_argon2()?;

    let hash = argon2.hash_password(password.as_bytes(), &salt).map_err(|e| Error::Internal {
        operation: format!("hash password: {e}"),
    })?;

    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash.
///
/// Verification uses the parameters embedded in the hash itself.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| Error::Internal {
        operation: format!("parse hash: {e}"),
    })?;

    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> Argon2Params {
        Argon2Params {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("test_password_123", fast_params()).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("test_password_123", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_same_input_different_hashes() {
        let hash1 = hash_password("same_password", fast_params()).unwrap();
        let hash2 = hash_password("same_password", fast_params()).unwrap();

        // Salted, so the hashes differ but both verify
        assert_ne!(hash1, hash2);
        assert!(verify_password("same_password", &hash1).unwrap());
        assert!(verify_password("same_password", &hash2).unwrap());
    }

    #[test]
    fn test_default_params_round_trip() {
        let hash = hash_password("pw", Argon2Params::default()).unwrap();
        assert!(hash.contains("m=19456,t=2,p=1"));
        assert!(verify_password("pw", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(verify_password("pw", "not-a-hash"), Err(Error::Internal { .. })));
    }

    #[test]
    fn test_invalid_params_are_internal_errors() {
        let params = Argon2Params {
            memory_kib: 0,
            iterations: 0,
            parallelism: 0,
        };
        assert!(matches!(hash_password("pw", params), Err(Error::Internal { .. })));
    }
}
