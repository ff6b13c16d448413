//! Notification channel between the HTTP client and the UI shell.
//!
//! The client never talks to the UI directly. It emits [`Notification`]s
//! through an injected [`Notifier`]; the shell drains them on its tick and
//! turns them into status bar alerts or the login prompt.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Severity attached to a global alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Payload of a `global-alert` signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub message: String,
    pub severity: Severity,
}

impl Alert {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The stored token was rejected and has been cleared
    TokenExpired,
    GlobalAlert(Alert),
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sending half handed to the client; the UI owns the receiver.
#[derive(Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            log::debug!("Notification dropped, no listener attached");
        }
    }
}

/// Keeps every notification in order; handy for headless callers and tests.
#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.notifications()
            .into_iter()
            .filter_map(|n| match n {
                Notification::GlobalAlert(alert) => Some(alert),
                Notification::TokenExpired => None,
            })
            .collect()
    }

    pub fn token_expired_count(&self) -> usize {
        self.notifications()
            .iter()
            .filter(|n| matches!(n, Notification::TokenExpired))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
        assert_eq!(Severity::Error.to_string(), "error");
    }

    #[tokio::test]
    async fn test_channel_notifier_delivers_in_order() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.notify(Notification::TokenExpired);
        notifier.notify(Notification::GlobalAlert(Alert::warning("careful")));

        assert_eq!(rx.recv().await, Some(Notification::TokenExpired));
        assert_eq!(rx.recv().await, Some(Notification::GlobalAlert(Alert::warning("careful"))));
    }

    #[test]
    fn test_channel_notifier_without_receiver_does_not_panic() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.notify(Notification::TokenExpired);
    }
}
