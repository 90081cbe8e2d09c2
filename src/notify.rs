//! User-facing notifications.
//!
//! The channel is explicit, not a module-level store: workflows take a
//! `&Notifier` and the host owns the receiving end, rendering or
//! discarding notices as it sees fit.
//! Notifications are best-effort; a dropped receiver never fails a
//! workflow.

use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// One notification for the user.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub id: Uuid,
    pub level: NoticeLevel,
    pub message: String,
}

/// Sending half of the notification channel, passed by reference into
/// workflows.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
    /// Create a notifier and the receiver the host should drain.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Warning, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message.into());
    }

    fn push(&self, level: NoticeLevel, message: String) {
        let notice = Notice {
            id: Uuid::new_v4(),
            level,
            message,
        };
        if self.tx.send(notice).is_err() {
            tracing::debug!("notification receiver dropped, notice discarded");
        }
    }
}
