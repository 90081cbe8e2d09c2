//! Per-operation submit-in-flight guards.
//!
//! Once a save or payment request is dispatched it cannot be aborted, so
//! the only protection against double submission is refusing to start a
//! second request of the same kind while one is outstanding. This is a
//! guard per operation kind, not a global lock: a payment may be recorded
//! while a booking is in flight.

use std::collections::HashSet;
use std::sync::Mutex;

use serde::Serialize;

/// What kind of submission is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitKind {
    Booking,
    Consultation,
    Payment,
    AttachmentRetry,
    Registration,
}

impl std::fmt::Display for SubmitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Booking => write!(f, "booking"),
            Self::Consultation => write!(f, "consultation"),
            Self::Payment => write!(f, "payment"),
            Self::AttachmentRetry => write!(f, "attachment retry"),
            Self::Registration => write!(f, "registration"),
        }
    }
}

/// Tracks which submission kinds are currently outstanding.
#[derive(Debug, Default)]
pub struct InflightGuards {
    active: Mutex<HashSet<SubmitKind>>,
}

impl InflightGuards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a submission of `kind`. Returns `None` if one of the same
    /// kind is already outstanding. The returned ticket releases the
    /// guard on drop, including on early return and panic.
    pub fn try_begin(&self, kind: SubmitKind) -> Option<SubmitTicket<'_>> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if !active.insert(kind) {
            tracing::debug!(%kind, "submission rejected, one already in flight");
            return None;
        }
        Some(SubmitTicket { guards: self, kind })
    }

    /// Whether a submission of `kind` is currently outstanding.
    pub fn is_inflight(&self, kind: SubmitKind) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&kind)
    }

    fn release(&self, kind: SubmitKind) {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&kind);
    }
}

/// Held for the duration of one submission.
#[must_use = "dropping the ticket immediately releases the guard"]
pub struct SubmitTicket<'a> {
    guards: &'a InflightGuards,
    kind: SubmitKind,
}

impl Drop for SubmitTicket<'_> {
    fn drop(&mut self) {
        self.guards.release(self.kind);
    }
}
