//! Password hashing and random string generation

use crate::domain::account::{EncodedPassword, PlainTextPassword};
use crate::error::{Error, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Turns plain text passwords into stored hashes and checks attempts
/// against them.
pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, password: &PlainTextPassword) -> Result<EncodedPassword>;
    fn matches(&self, attempt: &PlainTextPassword, encoded: &EncodedPassword) -> Result<bool>;
}

/// Argon2id password encoder with the library's default parameters
#[derive(Debug, Default, Clone)]
pub struct Argon2PasswordEncoder;

impl Argon2PasswordEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, password: &PlainTextPassword) -> Result<EncodedPassword> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|e| Error::PasswordHash(e.to_string()))?;
        EncodedPassword::new(hash.to_string())
    }

    fn matches(&self, attempt: &PlainTextPassword, encoded: &EncodedPassword) -> Result<bool> {
        let hash = PasswordHash::new(encoded.as_str())
            .map_err(|e| Error::PasswordHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(attempt.expose().as_bytes(), &hash)
            .is_ok())
    }
}

/// Generates alphanumeric strings for recovery tokens and replacement
/// passwords.
#[derive(Debug, Default, Clone)]
pub struct RandomStringGenerator;

impl RandomStringGenerator {
    pub fn new() -> Self {
        Self
    }

    /// A random alphanumeric string of the given length
    pub fn generate(&self, length: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }
}
