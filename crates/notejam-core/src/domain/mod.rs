//! Domain model: value objects, entities and repositories

pub mod account;
pub mod name;
pub mod note;
pub mod pad;
pub mod recovery;

pub use name::Name;
