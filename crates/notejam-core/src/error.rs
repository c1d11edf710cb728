//! Error types for Notejam

use thiserror::Error;

/// Result type alias using Notejam's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Notejam error types
///
/// Service-level failures (`WrongPassword`, `InvalidToken`,
/// `EmailAddressExists`) are meant to be caught by the presentation layer
/// and rendered as form errors. `AccessDenied` and `NotFound` propagate to
/// a boundary handler which maps them to an HTTP status.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Authenticated user is not authorized to access the entity.")]
    AccessDenied,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("The current password doesn't match.")]
    WrongPassword,

    #[error("{0}")]
    InvalidToken(String),

    #[error("The email address '{0}' is already registered.")]
    EmailAddressExists(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The HTTP status class a boundary handler would map this error to.
    pub fn status(&self) -> u16 {
        match self {
            Self::AccessDenied => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) | Self::InvalidToken(_) | Self::WrongPassword => 400,
            Self::EmailAddressExists(_) => 409,
            Self::Database(_) | Self::PasswordHash(_) | Self::Config(_) | Self::Io(_) => 500,
        }
    }

    /// Whether the caller can recover by retrying with corrected input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::WrongPassword | Self::InvalidToken(_) | Self::EmailAddressExists(_)
        )
    }
}
