//! Password recovery use cases
//!
//! A recovery starts with an email containing a one-time link. Redeeming
//! the link replaces the user's password with a generated one and ends
//! the process. Expired processes are swept by a background task.

use crate::config::Config;
use crate::domain::account::{EmailAddress, PlainTextPassword, UserRepository};
use crate::domain::recovery::{PasswordRecoveryProcess, RecoveryProcessRepository, RecoveryToken};
use crate::error::{Error, Result};
use crate::infrastructure::{MailDispatcher, MailMessage, PasswordEncoder, RandomStringGenerator};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Application service for password recovery
#[derive(Clone)]
pub struct RecoveryService {
    users: UserRepository,
    processes: RecoveryProcessRepository,
    encoder: Arc<dyn PasswordEncoder>,
    generator: RandomStringGenerator,
    mailer: MailDispatcher,
    config: Config,
}

impl RecoveryService {
    pub fn new(
        users: UserRepository,
        processes: RecoveryProcessRepository,
        encoder: Arc<dyn PasswordEncoder>,
        generator: RandomStringGenerator,
        mailer: MailDispatcher,
        config: Config,
    ) -> Self {
        Self {
            users,
            processes,
            encoder,
            generator,
            mailer,
            config,
        }
    }

    /// Start a recovery for the given address and mail its owner a link.
    ///
    /// An unknown address is not an error; reporting it would tell the
    /// caller which addresses are registered.
    pub async fn start_password_recovery(&self, email: &EmailAddress) -> Result<()> {
        let Some(user) = self.users.get_by_email(email).await? else {
            tracing::info!("Recovery requested for unknown email address");
            return Ok(());
        };

        let token = RecoveryToken::new(self.generator.generate(self.config.recovery.token_length));
        let expires_at = Utc::now() + self.config.recovery_lifetime();
        let process = PasswordRecoveryProcess::new(user.id(), token, expires_at)?;
        self.processes.create(&process).await?;

        self.mailer.dispatch(MailMessage {
            to: user.email().as_str().to_string(),
            from: self.config.mail.sender.clone(),
            subject: "Password recovery".to_string(),
            body: format!(
                "To reset your password, follow this link:\n\n{}\n\nThe link expires on {}.",
                self.recovery_uri(&process),
                process.expires_at().format("%Y-%m-%d %H:%M UTC"),
            ),
        });

        tracing::info!(process_id = %process.id(), "Password recovery started");
        Ok(())
    }

    /// Redeem a recovery link: replace the user's password with a
    /// generated one and end the process.
    ///
    /// Returns the new plain text password so it can be shown to the
    /// user exactly once; it is never mailed, logged or stored. The
    /// process is single-use; a second redemption fails as if the
    /// process never existed.
    pub async fn redeem(&self, process_id: Uuid, token: &RecoveryToken) -> Result<PlainTextPassword> {
        let process = self
            .processes
            .get(process_id)
            .await?
            .ok_or_else(|| Error::InvalidToken("Process id is invalid.".into()))?;

        if process.is_expired() {
            return Err(Error::InvalidToken("Process is expired.".into()));
        }
        if process.token() != token {
            return Err(Error::InvalidToken("Token doesn't match.".into()));
        }

        let mut user = self
            .users
            .get(process.user_id())
            .await?
            .ok_or_else(|| Error::NotFound("User".into()))?;

        let password =
            PlainTextPassword::new(self.generator.generate(self.config.recovery.password_length))?;
        user.change_password(self.encoder.encode(&password)?);
        self.users.update_password(&user).await?;
        self.processes.delete(process.id()).await?;

        tracing::info!(process_id = %process.id(), "Password recovery redeemed");
        Ok(password)
    }

    /// Remove every process that has expired, returning how many
    pub async fn purge_expired(&self) -> Result<u64> {
        let removed = self.processes.delete_expired_before(Utc::now()).await?;
        if removed > 0 {
            tracing::info!(removed, "Purged expired recovery processes");
        }
        Ok(removed)
    }

    /// Spawn the background sweep that purges expired processes at the
    /// configured interval
    pub fn spawn_purge_task(&self) -> tokio::task::JoinHandle<()> {
        let service = self.clone();
        let interval = self.config.purge_interval();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so a sweep never
            // races application start-up.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = service.purge_expired().await {
                    tracing::warn!(error = %e, "Recovery purge sweep failed");
                }
            }
        })
    }

    /// The link a user follows to redeem a process
    pub fn recovery_uri(&self, process: &PasswordRecoveryProcess) -> String {
        format!(
            "{}/recovery/{}/{}",
            self.config.mail.base_url.trim_end_matches('/'),
            process.id(),
            process.token().as_str(),
        )
    }
}
