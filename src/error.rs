//! Error taxonomy for the clinic workflows.
//!
//! Three families, kept deliberately distinct:
//! - `ValidationError`: malformed or missing input, caught before any
//!   network call is made.
//! - `PersistenceError` / `ConflictError` (in `api::error`); the backend
//!   write failed, or rejected a duplicate record.
//! - `WorkflowError`: everything a workflow can surface to the caller,
//!   including partial multi-step failures that need a narrower retry.

use thiserror::Error;

use crate::api::error::{ConflictError, PersistenceError};
use crate::inflight::SubmitKind;
use crate::lifecycle::StaffAction;
use crate::models::{Role, Visit};

/// Malformed or missing input. Always raised before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no patient associated with this booking")]
    MissingPatient,

    #[error("required field is empty: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid mobile number: {0}")]
    InvalidMobile(String),

    #[error("payment amount must be greater than zero, got {0}")]
    NonPositiveAmount(i64),

    #[error("discount cannot be negative, got {0}")]
    NegativeDiscount(i64),

    #[error("sittings must be at least 1")]
    ZeroSittings,

    #[error("visit status cannot move from {from} to {to}")]
    InvalidTransition {
        from: crate::models::VisitStatus,
        to: crate::models::VisitStatus,
    },

    #[error("attachment {name} is {size} bytes, exceeding the {limit} byte limit")]
    AttachmentTooLarge {
        name: String,
        size: usize,
        limit: usize,
    },
}

/// Failure of a clinic workflow (booking, consultation, payment).
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// The visit itself was saved, only the attachment upload failed.
    /// Carries the saved visit so the caller can retry just the upload.
    #[error("visit {} saved, but the attachment upload failed", visit.id)]
    AttachmentUpload {
        visit: Box<Visit>,
        #[source]
        source: PersistenceError,
    },

    /// A submission of the same kind is already outstanding.
    #[error("a {0} submission is already in progress")]
    SubmissionInFlight(SubmitKind),

    /// The current role may not perform this action. Checked in the core,
    /// not just hidden in the UI.
    #[error("role {role} is not permitted to {action}")]
    NotPermitted { role: Role, action: StaffAction },
}

impl WorkflowError {
    /// True when only the attachment step needs to be retried.
    pub fn is_attachment_only(&self) -> bool {
        matches!(self, WorkflowError::AttachmentUpload { .. })
    }
}

impl From<crate::api::error::RegistrationError> for WorkflowError {
    fn from(err: crate::api::error::RegistrationError) -> Self {
        use crate::api::error::RegistrationError;
        match err {
            RegistrationError::Conflict(e) => Self::Conflict(e),
            RegistrationError::Persistence(e) => Self::Persistence(e),
        }
    }
}
