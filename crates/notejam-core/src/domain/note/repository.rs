//! Note repository for database operations

use super::Note;
use crate::application::security::Owned;
use crate::application::Page;
use crate::domain::Name;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for note database operations
#[derive(Debug, Clone)]
pub struct NoteRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct NoteRow {
    id: String,
    owner_id: String,
    pad_id: Option<String>,
    name: String,
    text: String,
    updated_at: DateTime<Utc>,
}

impl NoteRow {
    fn into_note(self) -> Result<Note> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| Error::Validation(format!("Corrupt note id in storage: {}", e)))?;
        let owner_id = Uuid::parse_str(&self.owner_id)
            .map_err(|e| Error::Validation(format!("Corrupt owner id in storage: {}", e)))?;
        let pad_id = self
            .pad_id
            .map(|raw| {
                Uuid::parse_str(&raw)
                    .map_err(|e| Error::Validation(format!("Corrupt pad id in storage: {}", e)))
            })
            .transpose()?;
        Ok(Note::from_parts(
            id,
            Name::new(self.name)?,
            self.text,
            owner_id,
            pad_id,
            self.updated_at,
        ))
    }
}

impl NoteRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save a new note to the database
    pub async fn create(&self, note: &Note) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notes (id, owner_id, pad_id, name, text, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(note.id().to_string())
        .bind(note.owner_id().to_string())
        .bind(note.pad_id().map(|id| id.to_string()))
        .bind(note.name().as_str())
        .bind(note.text())
        .bind(note.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a note by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<Note>> {
        let row: Option<NoteRow> = sqlx::query_as(
            "SELECT id, owner_id, pad_id, name, text, updated_at FROM notes WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(NoteRow::into_note).transpose()
    }

    /// List a page of a user's notes, most recently updated first
    pub async fn list_by_owner(&self, owner_id: Uuid, page: Page) -> Result<Vec<Note>> {
        let rows: Vec<NoteRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, pad_id, name, text, updated_at
            FROM notes
            WHERE owner_id = ?
            ORDER BY updated_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(owner_id.to_string())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(NoteRow::into_note).collect()
    }

    /// List a page of a pad's notes, most recently updated first
    pub async fn list_by_pad(&self, pad_id: Uuid, page: Page) -> Result<Vec<Note>> {
        let rows: Vec<NoteRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, pad_id, name, text, updated_at
            FROM notes
            WHERE pad_id = ?
            ORDER BY updated_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(pad_id.to_string())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(NoteRow::into_note).collect()
    }

    /// Update a note
    pub async fn update(&self, note: &Note) -> Result<()> {
        sqlx::query("UPDATE notes SET name = ?, text = ?, pad_id = ?, updated_at = ? WHERE id = ?")
            .bind(note.name().as_str())
            .bind(note.text())
            .bind(note.pad_id().map(|id| id.to_string()))
            .bind(note.updated_at())
            .bind(note.id().to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a note
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete all notes in a pad, returning how many were removed
    pub async fn delete_by_pad(&self, pad_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notes WHERE pad_id = ?")
            .bind(pad_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
