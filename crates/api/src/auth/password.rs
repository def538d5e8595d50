//! Argon2id password hashing, verification, and strength validation.
//!
//! Hashes are stored as PHC strings so the parameters and salt travel with
//! the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use validator::ValidationError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only for a malformed hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// At least [`MIN_PASSWORD_LENGTH`] characters with one letter and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    if !password.chars().any(|c| c.is_alphabetic()) || !password.chars().any(|c| c.is_ascii_digit())
    {
        return Err("Password must contain at least one letter and one number".into());
    }
    Ok(())
}

/// [`validate_password_strength`] adapted for `#[validate(custom(...))]`.
pub fn strong_password(password: &str) -> Result<(), ValidationError> {
    validate_password_strength(password).map_err(|msg| {
        let mut err = ValidationError::new("password_strength");
        err.message = Some(msg.into());
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("parking123").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("parking123", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("parking123").unwrap();
        assert!(!verify_password("parking124", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_strength_rules() {
        assert!(validate_password_strength("abc12").is_err());
        assert!(validate_password_strength("abcdefgh").is_err());
        assert!(validate_password_strength("12345678").is_err());
        assert!(validate_password_strength("abcdefg1").is_ok());
    }

    #[test]
    fn test_strength_validator_carries_message() {
        let err = strong_password("short").unwrap_err();
        assert_eq!(err.code, "password_strength");
        assert!(err.message.unwrap().contains("at least 8"));
    }
}
