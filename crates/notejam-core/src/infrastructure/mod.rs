//! Infrastructure adapters: password hashing, random material, mail

pub mod mail;
pub mod security;

pub use mail::{MailDispatcher, MailMessage, MailTransport};
pub use security::{Argon2PasswordEncoder, PasswordEncoder, RandomStringGenerator};
