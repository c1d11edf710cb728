//! Account use cases: sign-up and password changes

use super::security::{authorize_user, Authentication};
use crate::domain::account::{EmailAddress, PlainTextPassword, User, UserRepository};
use crate::error::{Error, Result};
use crate::infrastructure::PasswordEncoder;
use std::sync::Arc;

/// Application service for user accounts
#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    encoder: Arc<dyn PasswordEncoder>,
}

impl UserService {
    pub fn new(users: UserRepository, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { users, encoder }
    }

    /// Register a new account
    pub async fn sign_up(&self, email: EmailAddress, password: PlainTextPassword) -> Result<User> {
        if self.users.email_exists(&email).await? {
            return Err(Error::EmailAddressExists(email.as_str().to_string()));
        }

        let encoded = self.encoder.encode(&password)?;
        let user = User::new(email, encoded);
        self.users.create(&user).await?;

        tracing::info!(user_id = %user.id(), "User signed up");
        Ok(user)
    }

    /// Look up a user by email address
    pub async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>> {
        self.users.get_by_email(email).await
    }

    /// Change the caller's own password
    ///
    /// The current password must match the stored one; on mismatch
    /// nothing is written.
    pub async fn change_password(
        &self,
        auth: &Authentication,
        current: PlainTextPassword,
        new: PlainTextPassword,
    ) -> Result<()> {
        let caller = auth.require()?;
        let mut user = self
            .users
            .get(caller.id())
            .await?
            .ok_or_else(|| Error::NotFound("User".into()))?;
        authorize_user(auth, &user)?;

        if !self.encoder.matches(&current, user.password())? {
            return Err(Error::WrongPassword);
        }

        user.change_password(self.encoder.encode(&new)?);
        self.users.update_password(&user).await?;

        tracing::info!(user_id = %user.id(), "Password changed");
        Ok(())
    }
}
