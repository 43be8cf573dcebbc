//! Password hashing for stored credentials.
//!
//! One explicitly-owned hasher is constructed at startup and handed to the
//! authentication service; nothing reaches for a shared global encoder.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};

/// Errors raised while hashing or verifying passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// Hashing failed; usually an allocation or parameter problem.
    #[error("password hashing failed: {message}")]
    Hash { message: String },
    /// A stored hash was not a valid PHC string.
    #[error("stored password hash is malformed: {message}")]
    MalformedStoredHash { message: String },
}

/// Argon2id hasher producing self-describing PHC strings.
///
/// Verification re-derives the hash with the parameters embedded in the
/// stored string, so parameter upgrades only affect newly-written hashes.
///
/// # Examples
/// ```
/// use backend::domain::PasswordHasher;
///
/// let hasher = PasswordHasher::new();
/// let hash = hasher.hash("hunter2hunter2").expect("hashing succeeds");
/// assert!(hasher.verify("hunter2hunter2", &hash).expect("verification runs"));
/// assert!(!hasher.verify("wrong", &hash).expect("verification runs"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Hasher with the library's current default Argon2id parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::Hash {
                message: err.to_string(),
            })?;
        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored PHC hash.
    ///
    /// The comparison is constant-time with respect to the stored hash. A
    /// mismatch is `Ok(false)`; only an unusable stored hash is an error.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordHashError> {
        let parsed =
            PasswordHash::new(stored).map_err(|err| PasswordHashError::MalformedStoredHash {
                message: err.to_string(),
            })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::MalformedStoredHash {
                message: err.to_string(),
            }),
        }
    }
}
