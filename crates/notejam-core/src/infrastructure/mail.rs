//! Asynchronous mail dispatch
//!
//! Mail is fire-and-forget: a bounded queue feeds a single worker task,
//! and a full queue drops the message with a warning rather than block
//! the caller. Delivery failures are logged and swallowed.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// An outgoing email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

/// Delivers mail to the outside world
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: MailMessage) -> anyhow::Result<()>;
}

/// Hands messages to a background worker that pushes them through the
/// configured transport.
#[derive(Debug, Clone)]
pub struct MailDispatcher {
    queue: Option<mpsc::Sender<MailMessage>>,
}

impl MailDispatcher {
    /// Spawn the worker task and return a dispatcher feeding it
    pub fn new(transport: Arc<dyn MailTransport>, queue_capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<MailMessage>(queue_capacity.max(1));

        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                let to = message.to.clone();
                if let Err(e) = transport.send(message).await {
                    tracing::warn!(to = %to, error = %e, "Failed to deliver mail");
                }
            }
        });

        Self { queue: Some(tx) }
    }

    /// A dispatcher without a transport; every message is logged and
    /// discarded
    pub fn disabled() -> Self {
        Self { queue: None }
    }

    /// Queue a message for delivery. Never blocks and never fails.
    pub fn dispatch(&self, message: MailMessage) {
        let Some(queue) = &self.queue else {
            tracing::info!(to = %message.to, subject = %message.subject, "Mail disabled, dropping message");
            return;
        };
        if let Err(e) = queue.try_send(message) {
            tracing::warn!(error = %e, "Mail queue full, dropping message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<MailMessage>>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, message: MailMessage) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl MailTransport for FailingTransport {
        async fn send(&self, _message: MailMessage) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
    }

    fn message(subject: &str) -> MailMessage {
        MailMessage {
            to: "fred@example.com".into(),
            from: "noreply@notejam.example".into(),
            subject: subject.into(),
            body: "body".into(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_delivers() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = MailDispatcher::new(transport.clone(), 16);

        dispatcher.dispatch(message("Password recovery"));

        // Give the worker a moment to drain the queue
        for _ in 0..50 {
            if !transport.sent.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Password recovery");
    }

    #[tokio::test]
    async fn test_disabled_dispatcher_is_a_no_op() {
        let dispatcher = MailDispatcher::disabled();
        dispatcher.dispatch(message("Password recovery"));
    }

    #[tokio::test]
    async fn test_delivery_failure_is_swallowed() {
        let dispatcher = MailDispatcher::new(Arc::new(FailingTransport), 16);
        dispatcher.dispatch(message("Password recovery"));
        tokio::time::sleep(Duration::from_millis(20)).await;
        // The dispatcher is still usable after a failed delivery
        dispatcher.dispatch(message("Again"));
    }
}
