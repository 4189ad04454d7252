//! Credential generation, comparison and hashing.
//!
//! Temporary credentials are one-time secrets minted on approval and
//! consumed by the first-login exchange. Permanent credentials are never
//! stored in plaintext; only their argon2 hash is persisted.

use argon2::password_hash::rand_core::OsRng as SaltRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;

use crate::error::{CoreError, Result};

/// Length of generated temporary credentials.
///
/// The policy minimum is 12; we mint 16 for headroom.
pub const TEMPORARY_CREDENTIAL_LEN: usize = 16;

const LOWER: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const DIGITS: &[u8] = b"23456789";
const SYMBOLS: &[u8] = b"!@#$%&*+-=?";

/// Generate a one-time temporary credential.
///
/// The secret is drawn entirely from the OS random source and contains
/// at least one character from each of four classes (lowercase,
/// uppercase, digit, symbol). Visually ambiguous characters (`l`, `I`,
/// `O`, `0`, `1`) are excluded since the secret is transcribed from an
/// email. Randomness is never seeded from request metadata.
///
/// # Examples
///
/// ```
/// let secret = backoffice_core::credential::generate();
/// assert_eq!(secret.len(), backoffice_core::credential::TEMPORARY_CREDENTIAL_LEN);
/// ```
#[must_use]
pub fn generate() -> String {
    let mut rng = OsRng;
    let mut chars: Vec<u8> = Vec::with_capacity(TEMPORARY_CREDENTIAL_LEN);

    // One guaranteed character per class.
    for class in [LOWER, UPPER, DIGITS, SYMBOLS] {
        if let Some(&c) = class.choose(&mut rng) {
            chars.push(c);
        }
    }

    // Fill the remainder from the combined alphabet.
    let combined: Vec<u8> = [LOWER, UPPER, DIGITS, SYMBOLS].concat();
    while chars.len() < TEMPORARY_CREDENTIAL_LEN {
        if let Some(&c) = combined.choose(&mut rng) {
            chars.push(c);
        }
    }

    // Shuffle so the class-guaranteed characters are not positional.
    chars.shuffle(&mut rng);

    // The alphabet is pure ASCII.
    String::from_utf8_lossy(&chars).into_owned()
}

/// Compare a supplied temporary credential against the stored one.
///
/// Constant-time over the credential bytes so a mismatch leaks nothing
/// about how much of the secret matched.
#[must_use]
pub fn verify_temporary(supplied: &str, stored: &str) -> bool {
    constant_time_eq(supplied.as_bytes(), stored.as_bytes())
}

/// Hash a permanent credential with argon2id and a fresh per-record salt.
///
/// # Errors
///
/// Returns [`CoreError::Internal`] if the hasher rejects its parameters;
/// this does not happen with the default configuration.
pub fn hash_credential(credential: &str) -> Result<String> {
    let salt = SaltString::generate(&mut SaltRng);
    let hash = Argon2::default()
        .hash_password(credential.as_bytes(), &salt)
        .map_err(|e| CoreError::Internal(format!("credential hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a permanent credential against its stored argon2 hash.
///
/// # Errors
///
/// Returns [`CoreError::Internal`] if the stored hash cannot be parsed.
pub fn verify_credential(credential: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| CoreError::Internal(format!("stored hash malformed: {e}")))?;
    Ok(Argon2::default()
        .verify_password(credential.as_bytes(), &parsed)
        .is_ok())
}
