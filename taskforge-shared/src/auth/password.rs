/// Password hashing using Argon2id
///
/// Hashes carry their own parameters and salt in PHC string format, so
/// verification needs no configuration. A hashing failure is always an
/// explicit error to the caller; there is no code path that hands back
/// an empty hash.
///
/// # Example
///
/// ```
/// use taskforge_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123")?;
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// Failed to verify password against a stored hash
    #[error("failed to verify password: {0}")]
    Verify(String),

    /// Stored hash is not a valid PHC string
    #[error("invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password with Argon2id and a fresh random salt
///
/// # Errors
///
/// Returns `PasswordError::Hash` if hashing fails. Callers must treat
/// that as an internal error, never as an empty hash.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Verification is constant-time. A wrong password is `Ok(false)`, not
/// an error; only a malformed hash or an internal failure is an `Err`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_phc_format() {
        let hash = hash_password("test_password_123").expect("hash should succeed");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_hash_password_salts_differ() {
        let hash1 = hash_password("same_password").expect("hash 1 should succeed");
        let hash2 = hash_password("same_password").expect("hash 2 should succeed");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("correct_password").expect("hash should succeed");
        assert!(verify_password("correct_password", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correct_password").expect("hash should succeed");
        assert!(!verify_password("wrong_password", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("password", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        for password in ["simple", "with spaces", "unicode-密码", "!@#$%^&*()"] {
            let hash = hash_password(password).expect("hash should succeed");
            assert!(
                verify_password(password, &hash).expect("verify should succeed"),
                "password '{}' should verify",
                password
            );
        }
    }
}
