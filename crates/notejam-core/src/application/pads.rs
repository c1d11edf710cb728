//! Pad use cases

use super::security::{authorize, Authentication};
use crate::domain::note::NoteRepository;
use crate::domain::pad::{Pad, PadRepository};
use crate::domain::Name;
use crate::error::{Error, Result};
use uuid::Uuid;

/// Application service for pads
#[derive(Debug, Clone)]
pub struct PadService {
    pads: PadRepository,
    notes: NoteRepository,
}

impl PadService {
    pub fn new(pads: PadRepository, notes: NoteRepository) -> Self {
        Self { pads, notes }
    }

    /// Create a pad for the given owner
    pub async fn create_pad(
        &self,
        auth: &Authentication,
        name: Name,
        owner_id: Uuid,
    ) -> Result<Pad> {
        let pad = Pad::new(name, owner_id);
        authorize(auth, Some(&pad))?;
        self.pads.create(&pad).await?;

        tracing::debug!(pad_id = %pad.id(), "Pad created");
        Ok(pad)
    }

    /// Show a single pad; absent pads are simply `None`
    pub async fn show_pad(&self, auth: &Authentication, id: Uuid) -> Result<Option<Pad>> {
        let pad = self.pads.get(id).await?;
        authorize(auth, pad.as_ref())?;
        Ok(pad)
    }

    /// List the caller's pads, oldest first
    pub async fn list_pads(&self, auth: &Authentication) -> Result<Vec<Pad>> {
        let caller = auth.require()?;
        self.pads.list_by_owner(caller.id()).await
    }

    /// Rename a pad
    pub async fn edit_pad(&self, auth: &Authentication, id: Uuid, name: Name) -> Result<Pad> {
        let mut pad = self
            .pads
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound("Pad".into()))?;
        authorize(auth, Some(&pad))?;

        pad.edit(name);
        self.pads.update(&pad).await?;
        Ok(pad)
    }

    /// Delete a pad along with every note in it
    pub async fn delete_pad(&self, auth: &Authentication, id: Uuid) -> Result<()> {
        let pad = self
            .pads
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound("Pad".into()))?;
        authorize(auth, Some(&pad))?;

        let removed = self.notes.delete_by_pad(pad.id()).await?;
        self.pads.delete(pad.id()).await?;

        tracing::debug!(pad_id = %pad.id(), notes_removed = removed, "Pad deleted");
        Ok(())
    }
}
