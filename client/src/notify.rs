use std::fmt;

use tokio::sync::broadcast;
use tracing::debug;

/// How many notifications a slow subscriber may fall behind before it starts
/// missing the oldest ones.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A user-visible message (a toast in a graphical front end).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// Fan-out channel for user-visible notifications.
///
/// Every clone publishes into the same channel. Publishing with nobody
/// subscribed is not an error; the notification is simply dropped.
#[derive(Clone, Debug)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn notify(&self, severity: Severity, message: impl Into<String>) {
        let notification = Notification {
            severity,
            message: message.into(),
        };
        debug!("Notify [{}] {}", notification.severity, notification.message);

        // Err only means there are no subscribers right now.
        let _ = self.tx.send(notification);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Severity::Error, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Severity::Success, message);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_receives_each_notification() {
        let notifier = Notifier::new();
        let mut a = notifier.subscribe();
        let mut b = notifier.clone().subscribe();

        notifier.error("boom");

        assert_eq!(a.recv().await.unwrap().message, "boom");
        let got = b.recv().await.unwrap();
        assert_eq!(got.severity, Severity::Error);
    }

    #[tokio::test]
    async fn success_is_published_with_its_severity() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        notifier.success("Uploaded scan-01.png");

        let got = rx.recv().await.unwrap();
        assert_eq!(got.severity, Severity::Success);
        assert_eq!(got.message, "Uploaded scan-01.png");
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let notifier = Notifier::new();
        notifier.success("nobody listening");
    }
}
