//! Password value objects
//!
//! `PlainTextPassword` exists only in memory and redacts itself in any
//! textual representation. `EncodedPassword` is the one-way-hashed form and
//! the only form ever persisted.

use crate::error::{Error, Result};
use std::fmt;

/// Minimum plain text password length
const MIN_LENGTH: usize = 8;
/// Maximum plain text password length
const MAX_LENGTH: usize = 128;

/// A validated plain text password
///
/// Never serialized, never logged. `Debug` and `Display` show `******`.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainTextPassword(String);

impl PlainTextPassword {
    /// Create a validated plain text password
    pub fn new(password: impl Into<String>) -> Result<Self> {
        let password = password.into();
        if password.is_empty() {
            return Err(Error::Validation("The password must not be empty!".into()));
        }
        if password.chars().count() < MIN_LENGTH {
            return Err(Error::Validation(
                "The password must have at least 8 characters!".into(),
            ));
        }
        if password.chars().count() > MAX_LENGTH {
            return Err(Error::Validation(
                "The password must not have more than 128 characters!".into(),
            ));
        }
        Ok(Self(password))
    }

    /// The raw password text, for handing to a password encoder
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PlainTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "******")
    }
}

impl fmt::Display for PlainTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "******")
    }
}

/// An encoded (one-way-hashed) password
///
/// Only a `PasswordEncoder` produces these; restoring one from storage is a
/// crate-internal operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPassword(String);

impl EncodedPassword {
    /// Wrap an encoder-produced hash
    pub(crate) fn new(encoded: impl Into<String>) -> Result<Self> {
        let encoded = encoded.into();
        if encoded.is_empty() {
            return Err(Error::Validation(
                "The encoded password must not be empty!".into(),
            ));
        }
        Ok(Self(encoded))
    }

    /// The stored hash string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
