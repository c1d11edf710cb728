//! Pad entity

use crate::application::security::Owned;
use crate::domain::Name;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A named grouping for notes, owned by one user
#[derive(Debug, Clone, Serialize)]
pub struct Pad {
    id: Uuid,
    name: Name,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
}

impl Pad {
    /// Create a new pad for the given owner
    pub fn new(name: Name, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            owner_id,
            created_at: Utc::now(),
        }
    }

    /// Restore a pad from its persisted parts
    pub(crate) fn from_parts(
        id: Uuid,
        name: Name,
        owner_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            owner_id,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Rename the pad
    pub fn edit(&mut self, name: Name) {
        self.name = name;
    }
}

impl Owned for Pad {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pad() {
        let owner = Uuid::new_v4();
        let pad = Pad::new(Name::new("Groceries").unwrap(), owner);
        assert_eq!(pad.name().as_str(), "Groceries");
        assert_eq!(pad.owner_id(), owner);
    }

    #[test]
    fn test_edit() {
        let mut pad = Pad::new(Name::new("Groceries").unwrap(), Uuid::new_v4());
        pad.edit(Name::new("Errands").unwrap());
        assert_eq!(pad.name().as_str(), "Errands");
    }
}
