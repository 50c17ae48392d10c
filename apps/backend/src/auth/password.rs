//! Argon2id password hashing.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use once_cell::sync::Lazy;

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash checked when the account doesn't exist, so an unknown email costs the
/// same Argon2 work as a wrong password. Same default params as real hashes.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("no-such-account-placeholder").ok());

/// Hash a password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// Check `password` against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; an unparseable stored hash is an internal error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Failed to parse password hash: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::internal(format!(
            "Password verification error: {e}"
        ))),
    }
}

/// [`hash_password`] on the blocking pool, off the async workers.
pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
}

/// Verify `password` on the blocking pool.
///
/// `stored_hash` is `None` for an unknown account: the dummy hash is checked
/// instead and the result is always `false`.
pub async fn verify_password_blocking(
    password: String,
    stored_hash: Option<String>,
) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => verify_password(&password, &hash),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(&password, dummy);
            }
            Ok(false)
        }
    })
    .await
    .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
}

pub fn validate_new_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("bismillah-123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("bismillah-123", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[tokio::test]
    async fn blocking_wrappers_match_the_sync_functions() {
        let hash = hash_password_blocking("bismillah-123".to_string()).await.unwrap();
        assert!(verify_password_blocking("bismillah-123".to_string(), Some(hash.clone()))
            .await
            .unwrap());
        assert!(!verify_password_blocking("nope".to_string(), Some(hash))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn unknown_account_never_verifies() {
        let verified = verify_password_blocking("no-such-account-placeholder".to_string(), None)
            .await
            .unwrap();
        assert!(!verified);
    }

    #[test]
    fn dummy_hash_costs_the_same_as_a_real_one() {
        let dummy = DUMMY_HASH.as_deref().expect("dummy hash is built");
        let real = hash_password("bismillah-123").unwrap();

        let dummy = PasswordHash::new(dummy).unwrap();
        let real = PasswordHash::new(&real).unwrap();
        assert_eq!(dummy.algorithm, real.algorithm);
        assert_eq!(dummy.version, real.version);
        assert_eq!(dummy.params, real.params);
    }

    #[test]
    fn salts_differ() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn corrupt_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(validate_new_password("1234567").is_err());
        assert!(validate_new_password("12345678").is_ok());
    }
}
