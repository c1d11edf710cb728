//! Note entity

use crate::application::security::Owned;
use crate::domain::pad::Pad;
use crate::domain::Name;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Maximum length of a note's text
const MAX_TEXT_LENGTH: usize = 10_000;

/// A titled text item, owned by one user, optionally placed in one pad
///
/// Invariant: a note placed in a pad shares that pad's owner. The
/// constructor and `edit` take the resolved pad so the invariant can be
/// checked before any state changes.
#[derive(Debug, Clone, Serialize)]
pub struct Note {
    id: Uuid,
    name: Name,
    text: String,
    owner_id: Uuid,
    pad_id: Option<Uuid>,
    updated_at: DateTime<Utc>,
}

impl Note {
    /// Create a new note
    pub fn new(name: Name, owner_id: Uuid, pad: Option<&Pad>, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        assert_valid(owner_id, pad, &text)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            text,
            owner_id,
            pad_id: pad.map(Pad::id),
            updated_at: Utc::now(),
        })
    }

    /// Restore a note from its persisted parts
    pub(crate) fn from_parts(
        id: Uuid,
        name: Name,
        text: String,
        owner_id: Uuid,
        pad_id: Option<Uuid>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            text,
            owner_id,
            pad_id,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pad_id(&self) -> Option<Uuid> {
        self.pad_id
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Edit the note, refreshing its last-updated timestamp
    pub fn edit(&mut self, name: Name, pad: Option<&Pad>, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        assert_valid(self.owner_id, pad, &text)?;

        self.name = name;
        self.pad_id = pad.map(Pad::id);
        self.text = text;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Checks the invariants shared by construction and editing.
fn assert_valid(owner_id: Uuid, pad: Option<&Pad>, text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(Error::Validation("A note must not be empty.".into()));
    }
    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(Error::Validation(
            "A note must not contain more than 10000 characters.".into(),
        ));
    }
    if let Some(pad) = pad {
        if pad.owner_id() != owner_id {
            return Err(Error::Validation(
                "The pad's owner must be identical with the note's owner.".into(),
            ));
        }
    }
    Ok(())
}

impl Owned for Note {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}
