//! User repository for database operations

use super::{EmailAddress, EncodedPassword, User};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for user database operations
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    password: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| Error::Validation(format!("Corrupt user id in storage: {}", e)))?;
        Ok(User::from_parts(
            id,
            EmailAddress::new(self.email)?,
            EncodedPassword::new(self.password)?,
            self.created_at,
        ))
    }
}

impl UserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save a new user to the database
    pub async fn create(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user.id().to_string())
        .bind(user.email().as_str())
        .bind(user.password().as_str())
        .bind(user.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a user by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password, created_at FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by email address
    pub async fn get_by_email(&self, email: &EmailAddress) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password, created_at FROM users WHERE email = ?",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Check if a user with the given email address exists
    pub async fn email_exists(&self, email: &EmailAddress) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM users WHERE email = ?")
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Persist a changed password
    pub async fn update_password(&self, user: &User) -> Result<()> {
        sqlx::query("UPDATE users SET password = ? WHERE id = ?")
            .bind(user.password().as_str())
            .bind(user.id().to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a user
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
