/// Credential hashing with Argon2id
///
/// User secrets are stored as salted Argon2id hashes in PHC string format and
/// compared with constant-time verification. Plaintext comparison is never
/// acceptable here, whatever a reference implementation happens to do.
///
/// # Example
///
/// ```
/// use scribeflow_shared::auth::password::{hash_secret, verify_secret};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_secret("correct horse battery staple")?;
/// assert!(verify_secret("correct horse battery staple", &hash)?);
/// assert!(!verify_secret("wrong guess", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Error type for credential hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash secret
    #[error("Failed to hash secret: {0}")]
    HashError(String),

    /// Failed to verify secret
    #[error("Failed to verify secret: {0}")]
    VerifyError(String),

    /// Stored hash is not a valid PHC string
    #[error("Invalid stored hash: {0}")]
    InvalidHash(String),
}

/// Hashes a secret with Argon2id and a fresh random salt
///
/// Output is a PHC string (`$argon2id$v=19$...`) embedding the parameters
/// and salt, so verification needs no extra bookkeeping.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_secret(secret: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Verifies a secret against a stored PHC hash
///
/// Returns `Ok(false)` on a mismatch; errors are reserved for a hash that
/// cannot be parsed or a verifier failure.
pub fn verify_secret(secret: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Minimum length check applied before hashing at registration
pub fn validate_secret_strength(secret: &str) -> Result<(), String> {
    if secret.len() < 8 {
        return Err("Secret must be at least 8 characters long".to_string());
    }

    Ok(())
}
