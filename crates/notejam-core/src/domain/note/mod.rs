//! Notes: titled text items, optionally placed in a pad

pub mod entity;
pub mod repository;

pub use entity::Note;
pub use repository::NoteRepository;
