//! User entity

use super::{EmailAddress, EncodedPassword};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A registered user
///
/// Created at sign-up; the password is the only field that ever changes.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    id: Uuid,
    email: EmailAddress,
    #[serde(skip_serializing)]
    password: EncodedPassword,
    created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with an already encoded password
    pub fn new(email: EmailAddress, password: EncodedPassword) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password,
            created_at: Utc::now(),
        }
    }

    /// Restore a user from its persisted parts
    pub(crate) fn from_parts(
        id: Uuid,
        email: EmailAddress,
        password: EncodedPassword,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            password,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &EncodedPassword {
        &self.password
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Overwrite the stored password with a newly encoded one
    pub fn change_password(&mut self, password: EncodedPassword) {
        self.password = password;
    }
}

impl PartialEq for User {
    /// Users are compared by identity
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::new(
            EmailAddress::new(email).unwrap(),
            EncodedPassword::new("$argon2id$stub").unwrap(),
        )
    }

    #[test]
    fn test_new_user_has_unique_id() {
        let a = user("a@example.com");
        let b = user("b@example.com");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_identity_equality() {
        let a = user("a@example.com");
        let mut same = a.clone();
        same.change_password(EncodedPassword::new("$argon2id$other").unwrap());
        assert_eq!(a, same, "users with the same id are the same user");

        let b = user("a@example.com");
        assert_ne!(a, b, "same email but different identity");
    }

    #[test]
    fn test_change_password() {
        let mut user = user("a@example.com");
        let new_password = EncodedPassword::new("$argon2id$new").unwrap();
        user.change_password(new_password.clone());
        assert_eq!(user.password(), &new_password);
    }
}
