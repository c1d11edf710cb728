//! User accounts: value objects, the user entity and its repository

pub mod email;
pub mod password;
pub mod repository;
pub mod user;

pub use email::EmailAddress;
pub use password::{EncodedPassword, PlainTextPassword};
pub use repository::UserRepository;
pub use user::User;
