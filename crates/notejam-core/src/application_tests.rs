//! End-to-end tests across the application services, run against an
//! in-memory database with real password hashing.

use crate::application::security::Authentication;
use crate::application::{NoteService, Page, PadService, RecoveryService, UserService};
use crate::config::Config;
use crate::domain::account::{EmailAddress, PlainTextPassword, User, UserRepository};
use crate::domain::note::NoteRepository;
use crate::domain::pad::PadRepository;
use crate::domain::recovery::{RecoveryProcessRepository, RecoveryToken};
use crate::domain::Name;
use crate::error::Error;
use crate::infrastructure::{
    Argon2PasswordEncoder, MailDispatcher, MailMessage, MailTransport, RandomStringGenerator,
};
use crate::storage::Database;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingTransport {
    fn messages(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }

    async fn wait_for_messages(&self, count: usize) -> Vec<MailMessage> {
        for _ in 0..100 {
            let messages = self.messages();
            if messages.len() >= count {
                return messages;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("Expected {} mail messages, got {:?}", count, self.messages());
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: MailMessage) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

struct Harness {
    db: Database,
    users: UserService,
    pads: PadService,
    notes: NoteService,
    recovery: RecoveryService,
    transport: Arc<RecordingTransport>,
    process_repo: RecoveryProcessRepository,
}

impl Harness {
    async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    async fn with_config(config: Config) -> Self {
        let db = Database::in_memory().await.expect("Failed to create database");
        let pool = db.pool().clone();
        let encoder: Arc<Argon2PasswordEncoder> = Arc::new(Argon2PasswordEncoder::new());
        let transport = Arc::new(RecordingTransport::default());

        let user_repo = UserRepository::new(pool.clone());
        let pad_repo = PadRepository::new(pool.clone());
        let note_repo = NoteRepository::new(pool.clone());
        let process_repo = RecoveryProcessRepository::new(pool.clone());

        Self {
            db,
            users: UserService::new(user_repo.clone(), encoder.clone()),
            pads: PadService::new(pad_repo.clone(), note_repo.clone()),
            notes: NoteService::new(note_repo, pad_repo),
            recovery: RecoveryService::new(
                user_repo,
                process_repo.clone(),
                encoder,
                RandomStringGenerator::new(),
                MailDispatcher::new(transport.clone(), config.mail.queue_capacity),
                config,
            ),
            transport,
            process_repo,
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> (User, Authentication) {
        let user = self
            .users
            .sign_up(
                EmailAddress::new(email).unwrap(),
                PlainTextPassword::new(password).unwrap(),
            )
            .await
            .unwrap();
        let auth = Authentication::user(user.clone());
        (user, auth)
    }

    /// The id and token of a user's single pending recovery process
    async fn pending_process(&self, user_id: Uuid) -> (Uuid, RecoveryToken) {
        let (id, token): (String, String) =
            sqlx::query_as("SELECT id, token FROM recovery_processes WHERE user_id = ?")
                .bind(user_id.to_string())
                .fetch_one(self.db.pool())
                .await
                .unwrap();
        (Uuid::parse_str(&id).unwrap(), RecoveryToken::new(token))
    }

    async fn backdate_process(&self, process_id: Uuid) {
        sqlx::query("UPDATE recovery_processes SET expires_at = ? WHERE id = ?")
            .bind(Utc::now() - Duration::days(1))
            .bind(process_id.to_string())
            .execute(self.db.pool())
            .await
            .unwrap();
    }
}

fn name(s: &str) -> Name {
    Name::new(s).unwrap()
}

#[tokio::test]
async fn test_sign_up_rejects_taken_email() {
    let h = Harness::new().await;
    h.sign_up("fred@example.com", "password1").await;

    let result = h
        .users
        .sign_up(
            EmailAddress::new("fred@example.com").unwrap(),
            PlainTextPassword::new("password2").unwrap(),
        )
        .await;
    assert!(matches!(result, Err(Error::EmailAddressExists(_))));
}

#[tokio::test]
async fn test_pads_are_private_to_their_owner() {
    let h = Harness::new().await;
    let (fred, fred_auth) = h.sign_up("fred@example.com", "password1").await;
    let (_mallory, mallory_auth) = h.sign_up("mallory@example.com", "password2").await;

    let pad = h
        .pads
        .create_pad(&fred_auth, name("Groceries"), fred.id())
        .await
        .unwrap();

    // Owner sees it
    assert!(h.pads.show_pad(&fred_auth, pad.id()).await.unwrap().is_some());

    // Anyone else is denied on every operation
    assert!(matches!(
        h.pads.show_pad(&mallory_auth, pad.id()).await,
        Err(Error::AccessDenied)
    ));
    assert!(matches!(
        h.pads.edit_pad(&mallory_auth, pad.id(), name("Stolen")).await,
        Err(Error::AccessDenied)
    ));
    assert!(matches!(
        h.pads.delete_pad(&mallory_auth, pad.id()).await,
        Err(Error::AccessDenied)
    ));
    assert!(matches!(
        h.pads.show_pad(&Authentication::anonymous(), pad.id()).await,
        Err(Error::AccessDenied)
    ));

    // A pad that doesn't exist is nobody's secret
    assert!(h
        .pads
        .show_pad(&Authentication::anonymous(), Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_notes_are_private_to_their_owner() {
    let h = Harness::new().await;
    let (fred, fred_auth) = h.sign_up("fred@example.com", "password1").await;
    let (_mallory, mallory_auth) = h.sign_up("mallory@example.com", "password2").await;

    let note = h
        .notes
        .write_note(&fred_auth, name("Milk"), fred.id(), None, "2 liters")
        .await
        .unwrap();

    assert!(matches!(
        h.notes.show_note(&mallory_auth, note.id()).await,
        Err(Error::AccessDenied)
    ));
    assert!(matches!(
        h.notes
            .edit_note(&mallory_auth, note.id(), name("Stolen"), None, "text")
            .await,
        Err(Error::AccessDenied)
    ));
    assert!(matches!(
        h.notes.delete_note(&mallory_auth, note.id()).await,
        Err(Error::AccessDenied)
    ));

    // Listings only ever show the caller's own notes
    let mallory_notes = h.notes.browse_notes(&mallory_auth, Page::default()).await.unwrap();
    assert!(mallory_notes.is_empty());
    let fred_notes = h.notes.browse_notes(&fred_auth, Page::default()).await.unwrap();
    assert_eq!(fred_notes.len(), 1);
}

#[tokio::test]
async fn test_note_cannot_be_placed_in_foreign_pad() {
    let h = Harness::new().await;
    let (fred, fred_auth) = h.sign_up("fred@example.com", "password1").await;
    let (mallory, mallory_auth) = h.sign_up("mallory@example.com", "password2").await;

    let pad = h
        .pads
        .create_pad(&mallory_auth, name("Private"), mallory.id())
        .await
        .unwrap();

    let result = h
        .notes
        .write_note(&fred_auth, name("Milk"), fred.id(), Some(pad.id()), "2 liters")
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_deleting_a_pad_removes_its_notes() {
    let h = Harness::new().await;
    let (fred, fred_auth) = h.sign_up("fred@example.com", "password1").await;

    let pad = h
        .pads
        .create_pad(&fred_auth, name("Groceries"), fred.id())
        .await
        .unwrap();
    let placed = h
        .notes
        .write_note(&fred_auth, name("Milk"), fred.id(), Some(pad.id()), "2 liters")
        .await
        .unwrap();
    let loose = h
        .notes
        .write_note(&fred_auth, name("Loose"), fred.id(), None, "text")
        .await
        .unwrap();

    h.pads.delete_pad(&fred_auth, pad.id()).await.unwrap();

    assert!(h.notes.show_note(&fred_auth, placed.id()).await.unwrap().is_none());
    assert!(h.notes.show_note(&fred_auth, loose.id()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_change_password() {
    let h = Harness::new().await;
    let (_fred, fred_auth) = h.sign_up("fred@example.com", "password1").await;

    // Wrong current password leaves the stored one untouched
    let result = h
        .users
        .change_password(
            &fred_auth,
            PlainTextPassword::new("wrong password").unwrap(),
            PlainTextPassword::new("new password").unwrap(),
        )
        .await;
    assert!(matches!(result, Err(Error::WrongPassword)));

    h.users
        .change_password(
            &fred_auth,
            PlainTextPassword::new("password1").unwrap(),
            PlainTextPassword::new("new password").unwrap(),
        )
        .await
        .unwrap();

    // The old password no longer matches after the change
    let result = h
        .users
        .change_password(
            &fred_auth,
            PlainTextPassword::new("password1").unwrap(),
            PlainTextPassword::new("another one").unwrap(),
        )
        .await;
    assert!(matches!(result, Err(Error::WrongPassword)));
}

#[tokio::test]
async fn test_recovery_round_trip() {
    let h = Harness::new().await;
    let (fred, _fred_auth) = h.sign_up("fred@example.com", "password1").await;

    let email = EmailAddress::new("fred@example.com").unwrap();
    h.recovery.start_password_recovery(&email).await.unwrap();

    let messages = h.transport.wait_for_messages(1).await;
    assert_eq!(messages[0].to, "fred@example.com");

    let (process_id, token) = h.pending_process(fred.id()).await;
    assert!(messages[0]
        .body
        .contains(&format!("/recovery/{}/{}", process_id, token.as_str())));

    let new_password = h.recovery.redeem(process_id, &token).await.unwrap();

    // Redemption only returns the password; it must never be mailed
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert_eq!(h.transport.messages().len(), 1);

    // The generated password is now the account's password
    h.users
        .change_password(
            &Authentication::user(fred.clone()),
            PlainTextPassword::new(new_password.expose()).unwrap(),
            PlainTextPassword::new("chosen password").unwrap(),
        )
        .await
        .unwrap();

    // Redemption is single-use
    let result = h.recovery.redeem(process_id, &token).await;
    match result {
        Err(Error::InvalidToken(message)) => assert_eq!(message, "Process id is invalid."),
        other => panic!("Expected invalid process id, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_recovery_for_unknown_email_is_silent() {
    let h = Harness::new().await;
    let email = EmailAddress::new("nobody@example.com").unwrap();
    h.recovery.start_password_recovery(&email).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert!(h.transport.messages().is_empty());
}

#[tokio::test]
async fn test_expired_process_cannot_be_redeemed() {
    let h = Harness::new().await;
    let (fred, _) = h.sign_up("fred@example.com", "password1").await;

    let email = EmailAddress::new("fred@example.com").unwrap();
    h.recovery.start_password_recovery(&email).await.unwrap();
    let (process_id, token) = h.pending_process(fred.id()).await;
    h.backdate_process(process_id).await;

    match h.recovery.redeem(process_id, &token).await {
        Err(Error::InvalidToken(message)) => assert_eq!(message, "Process is expired."),
        other => panic!("Expected expired process, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_wrong_token_is_rejected() {
    let h = Harness::new().await;
    let (fred, _) = h.sign_up("fred@example.com", "password1").await;

    let email = EmailAddress::new("fred@example.com").unwrap();
    h.recovery.start_password_recovery(&email).await.unwrap();
    let (process_id, _token) = h.pending_process(fred.id()).await;

    let wrong = RecoveryToken::new("definitely-not-the-token");
    match h.recovery.redeem(process_id, &wrong).await {
        Err(Error::InvalidToken(message)) => assert_eq!(message, "Token doesn't match."),
        other => panic!("Expected token mismatch, got {:?}", other.map(|_| ())),
    }

    // The process survives a failed attempt
    assert_eq!(h.process_repo.count_for_user(fred.id()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_purge_only_removes_expired_processes() {
    let h = Harness::new().await;
    let (fred, _) = h.sign_up("fred@example.com", "password1").await;
    let (mallory, _) = h.sign_up("mallory@example.com", "password2").await;

    let fred_email = EmailAddress::new("fred@example.com").unwrap();
    let mallory_email = EmailAddress::new("mallory@example.com").unwrap();
    h.recovery.start_password_recovery(&fred_email).await.unwrap();
    h.recovery.start_password_recovery(&mallory_email).await.unwrap();

    let (stale_id, _) = h.pending_process(fred.id()).await;
    h.backdate_process(stale_id).await;

    assert_eq!(h.recovery.purge_expired().await.unwrap(), 1);
    assert_eq!(h.process_repo.count_for_user(fred.id()).await.unwrap(), 0);
    assert_eq!(h.process_repo.count_for_user(mallory.id()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_purge_task_sweeps_at_configured_interval() {
    let mut config = Config::default();
    config.recovery.purge_interval_secs = 60;
    let h = Harness::with_config(config).await;
    let (fred, _) = h.sign_up("fred@example.com", "password1").await;

    let email = EmailAddress::new("fred@example.com").unwrap();
    h.recovery.start_password_recovery(&email).await.unwrap();
    let (process_id, _) = h.pending_process(fred.id()).await;
    h.backdate_process(process_id).await;

    // Pause the clock only after setup: sqlx runs SQLite work on a real
    // thread, and a paused clock auto-advances past the pool's acquire
    // timeout while that thread is busy.
    tokio::time::pause();
    let sweep = h.recovery.spawn_purge_task();

    // Past the first (skipped) tick and the first real one
    tokio::time::sleep(std::time::Duration::from_secs(61)).await;
    // Back to real time for the polling below, for the same reason:
    // auto-advance would skip past the pool's acquire timeout while the
    // sweep holds the single connection.
    tokio::time::resume();
    for _ in 0..100 {
        if h.process_repo.count_for_user(fred.id()).await.unwrap() == 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(h.process_repo.count_for_user(fred.id()).await.unwrap(), 0);

    sweep.abort();
}

#[tokio::test]
async fn test_editing_missing_entities_is_not_found() {
    let h = Harness::new().await;
    let (_fred, fred_auth) = h.sign_up("fred@example.com", "password1").await;

    assert!(matches!(
        h.pads.edit_pad(&fred_auth, Uuid::new_v4(), name("X")).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        h.notes.delete_note(&fred_auth, Uuid::new_v4()).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        h.notes
            .browse_pad_notes(&fred_auth, Uuid::new_v4(), Page::default())
            .await,
        Err(Error::NotFound(_))
    ));
}
