//! Pad repository for database operations

use super::Pad;
use crate::application::security::Owned;
use crate::domain::Name;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for pad database operations
#[derive(Debug, Clone)]
pub struct PadRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct PadRow {
    id: String,
    owner_id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl PadRow {
    fn into_pad(self) -> Result<Pad> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| Error::Validation(format!("Corrupt pad id in storage: {}", e)))?;
        let owner_id = Uuid::parse_str(&self.owner_id)
            .map_err(|e| Error::Validation(format!("Corrupt owner id in storage: {}", e)))?;
        Ok(Pad::from_parts(
            id,
            Name::new(self.name)?,
            owner_id,
            self.created_at,
        ))
    }
}

impl PadRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save a new pad to the database
    pub async fn create(&self, pad: &Pad) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pads (id, owner_id, name, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(pad.id().to_string())
        .bind(pad.owner_id().to_string())
        .bind(pad.name().as_str())
        .bind(pad.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a pad by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<Pad>> {
        let row: Option<PadRow> = sqlx::query_as(
            "SELECT id, owner_id, name, created_at FROM pads WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PadRow::into_pad).transpose()
    }

    /// List a user's pads, oldest first
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Pad>> {
        let rows: Vec<PadRow> = sqlx::query_as(
            "SELECT id, owner_id, name, created_at FROM pads WHERE owner_id = ? ORDER BY created_at",
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PadRow::into_pad).collect()
    }

    /// Update a pad
    pub async fn update(&self, pad: &Pad) -> Result<()> {
        sqlx::query("UPDATE pads SET name = ? WHERE id = ?")
            .bind(pad.name().as_str())
            .bind(pad.id().to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a pad
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM pads WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
