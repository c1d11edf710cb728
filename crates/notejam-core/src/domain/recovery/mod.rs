//! Password recovery processes and their tokens

pub mod process;
pub mod repository;

pub use process::{PasswordRecoveryProcess, RecoveryToken};
pub use repository::RecoveryProcessRepository;
