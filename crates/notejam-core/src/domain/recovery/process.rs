//! Password recovery process entity

use crate::application::security::Owned;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque token proving a recovery request was received by its owner.
///
/// Compared with plain string equality. The token never appears in
/// `Debug` output so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecoveryToken(String);

impl RecoveryToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for RecoveryToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RecoveryToken(******)")
    }
}

/// A pending password recovery for one user
///
/// Lives until it is redeemed, or expires and gets purged.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordRecoveryProcess {
    id: Uuid,
    user_id: Uuid,
    token: RecoveryToken,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl PasswordRecoveryProcess {
    /// Start a new process for a user, valid until `expires_at`
    pub fn new(user_id: Uuid, token: RecoveryToken, expires_at: DateTime<Utc>) -> Result<Self> {
        if expires_at <= Utc::now() {
            return Err(Error::Validation(
                "The expiration date must be in the future.".into(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            token,
            expires_at,
            created_at: Utc::now(),
        })
    }

    /// Restore a process from its persisted parts
    pub(crate) fn from_parts(
        id: Uuid,
        user_id: Uuid,
        token: RecoveryToken,
        expires_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            token,
            expires_at,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn token(&self) -> &RecoveryToken {
        &self.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

impl Owned for PasswordRecoveryProcess {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}
