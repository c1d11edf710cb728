//! Notejam Core Library
//!
//! This crate provides the application core for Notejam:
//! - Value objects (names, email addresses, passwords)
//! - Entities (users, pads, notes, password recovery processes)
//! - Ownership-based authorization
//! - Application services (notes, pads, accounts, password recovery)
//! - Storage (SQLite)
//! - Mail dispatch for recovery emails
//!
//! HTTP routing, controllers and view rendering are deliberately not part
//! of this crate; they are expected to call into the application services.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod storage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::application::security::Authentication;
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::storage::Database;
}

#[cfg(test)]
mod application_tests;
