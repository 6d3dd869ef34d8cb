//! Password hashing for account signup and login.
//!
//! Hashes are Argon2id in PHC string form, salted from [`OsRng`]. Storing
//! the PHC string means the salt and parameters travel with the hash, so
//! parameter upgrades only affect newly created accounts.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Shortest password accepted at signup, in bytes.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a plaintext password with a fresh random salt.
///
/// The returned string is PHC-formatted and goes into `users.password_hash`
/// verbatim.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hasher = Argon2::default(); // Argon2id with default params
    let hash = hasher.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check a login attempt against a stored PHC hash.
///
/// A mismatch is `Ok(false)`, not an error; `Err` means the stored hash
/// itself is malformed or the verifier failed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Reject passwords shorter than [`MIN_PASSWORD_LENGTH`].
///
/// The `Err` string is shown to the client as a validation message.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_accepts_correct_password() {
        let hash = hash_password("panel-by-panel-2024").expect("hashing failed");

        // Stored form must be a PHC string tagged argon2id.
        assert!(hash.starts_with("$argon2id$"), "got hash {hash}");

        let ok = verify_password("panel-by-panel-2024", &hash).expect("verify failed");
        assert!(ok);
    }

    #[test]
    fn test_rejects_wrong_password() {
        let hash = hash_password("the actual secret").expect("hashing failed");
        let ok = verify_password("a guess", &hash).expect("verify failed");
        assert!(!ok, "mismatch must be Ok(false), not a match");
    }

    #[test]
    fn test_garbage_stored_hash_is_an_error() {
        let result = verify_password("whatever", "not-a-phc-string");
        assert!(result.is_err(), "malformed hash must not verify");
    }

    #[test]
    fn test_short_password_message_names_minimum() {
        let msg = validate_password_strength("tiny").unwrap_err();
        assert!(msg.contains("at least 8 characters"), "got: {msg}");
    }

    #[test]
    fn test_minimum_length_boundary() {
        assert!(validate_password_strength("12345678").is_ok());
        assert!(validate_password_strength("1234567").is_err());
    }
}
