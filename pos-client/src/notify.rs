//! User-facing notification channel
//!
//! The sync engine broadcasts a [`Notice`] for every resolved mutation
//! outcome; dashboard components subscribe and render toasts. An
//! `AuthRequired` notice is the signal to clear session state and redirect to
//! login.

use serde::Serialize;
use tokio::sync::broadcast;

const NOTICE_CHANNEL_CAPACITY: usize = 256;

/// Toast severity
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
    /// Session invalid; the UI must redirect to login
    AuthRequired,
}

/// A single user-facing notification
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Broadcast sender for notices
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notice>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn notify(&self, kind: NoticeKind, message: impl Into<String>) {
        let notice = Notice {
            kind,
            message: message.into(),
        };
        if self.tx.send(notice).is_err() {
            tracing::debug!("Notice dropped: no active receivers");
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(NoticeKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(NoticeKind::Error, message);
    }
}
