//! Errors surfaced by the REST boundary.

use thiserror::Error;

/// A backend write or read failed. Never retried automatically; the
/// caller is told and local state is left as it was.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("cannot reach the clinic server at {0}")]
    Connection(String),

    #[error("request to the clinic server timed out")]
    Timeout,

    #[error("session expired or missing, log in again")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("the clinic server rejected the request ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("unexpected response from the clinic server: {0}")]
    ResponseParsing(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl PersistenceError {
    /// Map a reqwest failure onto the taxonomy.
    pub(crate) fn from_reqwest(err: reqwest::Error, base_url: &str) -> Self {
        if err.is_connect() {
            Self::Connection(base_url.to_string())
        } else if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err.to_string())
        }
    }
}

/// The backend refused to create a duplicate record. Distinct from a plain
/// persistence failure so the caller can offer navigation to the existing
/// record instead of a retry.
#[derive(Debug, Error)]
pub enum ConflictError {
    #[error("a patient with mobile {mobile} is already registered (id {existing_id})")]
    DuplicatePatient { mobile: String, existing_id: String },
}

/// Failure modes of patient registration specifically.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
