//! Note use cases

use super::security::{authorize, Authentication};
use super::Page;
use crate::domain::note::{Note, NoteRepository};
use crate::domain::pad::{Pad, PadRepository};
use crate::domain::Name;
use crate::error::{Error, Result};
use uuid::Uuid;

/// Application service for notes
#[derive(Debug, Clone)]
pub struct NoteService {
    notes: NoteRepository,
    pads: PadRepository,
}

impl NoteService {
    pub fn new(notes: NoteRepository, pads: PadRepository) -> Self {
        Self { notes, pads }
    }

    /// Write a new note, optionally placing it in a pad
    pub async fn write_note(
        &self,
        auth: &Authentication,
        name: Name,
        owner_id: Uuid,
        pad_id: Option<Uuid>,
        text: impl Into<String>,
    ) -> Result<Note> {
        let pad = self.resolve_pad(pad_id).await?;
        let note = Note::new(name, owner_id, pad.as_ref(), text)?;
        authorize(auth, Some(&note))?;
        self.notes.create(&note).await?;

        tracing::debug!(note_id = %note.id(), "Note created");
        Ok(note)
    }

    /// Show a single note; absent notes are simply `None`
    pub async fn show_note(&self, auth: &Authentication, id: Uuid) -> Result<Option<Note>> {
        let note = self.notes.get(id).await?;
        authorize(auth, note.as_ref())?;
        Ok(note)
    }

    /// A page of the caller's notes, most recently updated first
    pub async fn browse_notes(&self, auth: &Authentication, page: Page) -> Result<Vec<Note>> {
        let caller = auth.require()?;
        self.notes.list_by_owner(caller.id(), page).await
    }

    /// A page of a pad's notes, most recently updated first
    pub async fn browse_pad_notes(
        &self,
        auth: &Authentication,
        pad_id: Uuid,
        page: Page,
    ) -> Result<Vec<Note>> {
        let pad = self
            .pads
            .get(pad_id)
            .await?
            .ok_or_else(|| Error::NotFound("Pad".into()))?;
        authorize(auth, Some(&pad))?;
        self.notes.list_by_pad(pad.id(), page).await
    }

    /// Edit a note's name, text and pad placement
    pub async fn edit_note(
        &self,
        auth: &Authentication,
        id: Uuid,
        name: Name,
        pad_id: Option<Uuid>,
        text: impl Into<String>,
    ) -> Result<Note> {
        let mut note = self
            .notes
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound("Note".into()))?;
        authorize(auth, Some(&note))?;

        let pad = self.resolve_pad(pad_id).await?;
        note.edit(name, pad.as_ref(), text)?;
        self.notes.update(&note).await?;
        Ok(note)
    }

    /// Delete a note
    pub async fn delete_note(&self, auth: &Authentication, id: Uuid) -> Result<()> {
        let note = self
            .notes
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound("Note".into()))?;
        authorize(auth, Some(&note))?;

        self.notes.delete(note.id()).await?;
        tracing::debug!(note_id = %note.id(), "Note deleted");
        Ok(())
    }

    async fn resolve_pad(&self, pad_id: Option<Uuid>) -> Result<Option<Pad>> {
        match pad_id {
            Some(id) => {
                let pad = self
                    .pads
                    .get(id)
                    .await?
                    .ok_or_else(|| Error::NotFound("Pad".into()))?;
                Ok(Some(pad))
            }
            None => Ok(None),
        }
    }
}
