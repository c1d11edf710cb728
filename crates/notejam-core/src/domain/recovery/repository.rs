//! Recovery process repository for database operations

use super::{PasswordRecoveryProcess, RecoveryToken};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for password recovery process database operations
#[derive(Debug, Clone)]
pub struct RecoveryProcessRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ProcessRow {
    id: String,
    user_id: String,
    token: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl ProcessRow {
    fn into_process(self) -> Result<PasswordRecoveryProcess> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| Error::Validation(format!("Corrupt process id in storage: {}", e)))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| Error::Validation(format!("Corrupt user id in storage: {}", e)))?;
        Ok(PasswordRecoveryProcess::from_parts(
            id,
            user_id,
            RecoveryToken::new(self.token),
            self.expires_at,
            self.created_at,
        ))
    }
}

impl RecoveryProcessRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save a new recovery process to the database
    pub async fn create(&self, process: &PasswordRecoveryProcess) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO recovery_processes (id, user_id, token, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(process.id().to_string())
        .bind(process.user_id().to_string())
        .bind(process.token().as_str())
        .bind(process.expires_at())
        .bind(process.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a recovery process by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<PasswordRecoveryProcess>> {
        let row: Option<ProcessRow> = sqlx::query_as(
            "SELECT id, user_id, token, expires_at, created_at FROM recovery_processes WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProcessRow::into_process).transpose()
    }

    /// Delete a recovery process
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM recovery_processes WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete all processes that expired before the given instant,
    /// returning how many were removed
    pub async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM recovery_processes WHERE expires_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Count the pending processes for a user
    pub async fn count_for_user(&self, user_id: Uuid) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM recovery_processes WHERE user_id = ?")
                .bind(user_id.to_string())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
