//! Application services: use cases built on the domain model
//!
//! Each service takes the caller's [`Authentication`] explicitly and
//! authorizes against the loaded entity before acting on it.
//!
//! [`Authentication`]: security::Authentication

pub mod notes;
pub mod pads;
pub mod recovery;
pub mod security;
pub mod users;

pub use notes::NoteService;
pub use pads::PadService;
pub use recovery::RecoveryService;
pub use users::UserService;

/// Default number of items per page for note listings
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// A one-based page request for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u32,
    size: u32,
}

impl Page {
    /// Create a page request. A zero page number or size falls back to
    /// the first page of the default size.
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: if size == 0 { DEFAULT_PAGE_SIZE } else { size },
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Rows to skip in a query
    pub fn offset(&self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.size)
    }

    /// Rows to fetch in a query
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}
