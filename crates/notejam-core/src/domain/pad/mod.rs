//! Pads: named groupings for notes

pub mod entity;
pub mod repository;

pub use entity::Pad;
pub use repository::PadRepository;
