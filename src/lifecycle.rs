//! Visit lifecycle state machine and role permissions.
//!
//! The machine is small on purpose: `booked → completed` via consultation
//! completion, and `completed → completed` when a privileged role re-edits
//! a finished visit. `in_progress` exists in the backend's status set but
//! is reserved; nothing produces or consumes it here.
//!
//! Permission checks fail closed: an action not explicitly granted to a
//! role is denied, and workflows enforce this before touching the network
//! rather than merely hiding a button.

use crate::error::WorkflowError;
use crate::models::{Role, VisitStatus};

// ─── Transitions ──────────────────────────────────────────────────────────────

/// Whether the state machine defines a transition between two statuses.
pub fn can_transition(from: VisitStatus, to: VisitStatus) -> bool {
    matches!(
        (from, to),
        (VisitStatus::Booked, VisitStatus::Completed)
            | (VisitStatus::Completed, VisitStatus::Completed)
    )
}

/// Guard used by the consultation workflow before persisting.
pub fn ensure_transition(from: VisitStatus, to: VisitStatus) -> Result<(), WorkflowError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        tracing::warn!(%from, %to, "rejected visit status transition");
        Err(crate::error::ValidationError::InvalidTransition { from, to }.into())
    }
}

// ─── Staff actions ────────────────────────────────────────────────────────────

/// Everything a staff member can ask the core to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffAction {
    RegisterPatient,
    BookVisit,
    CompleteConsultation,
    EditCompletedVisit,
    RecordPayment,
    ManageCatalog,
    ManageUsers,
}

impl std::fmt::Display for StaffAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RegisterPatient => write!(f, "register a patient"),
            Self::BookVisit => write!(f, "book a visit"),
            Self::CompleteConsultation => write!(f, "complete a consultation"),
            Self::EditCompletedVisit => write!(f, "edit a completed visit"),
            Self::RecordPayment => write!(f, "record a payment"),
            Self::ManageCatalog => write!(f, "edit the treatment catalog"),
            Self::ManageUsers => write!(f, "manage staff accounts"),
        }
    }
}

/// The permission table. Anything not listed is denied.
pub fn permitted(role: Role, action: StaffAction) -> bool {
    use StaffAction::*;
    match action {
        RegisterPatient | BookVisit | RecordPayment => true,
        CompleteConsultation | EditCompletedVisit | ManageCatalog => {
            matches!(role, Role::Admin | Role::Doctor)
        }
        ManageUsers => matches!(role, Role::Admin),
    }
}

pub fn ensure_permitted(role: Role, action: StaffAction) -> Result<(), WorkflowError> {
    if permitted(role, action) {
        Ok(())
    } else {
        tracing::warn!(%role, %action, "action denied for role");
        Err(WorkflowError::NotPermitted { role, action })
    }
}

// ─── Open mode ────────────────────────────────────────────────────────────────

/// What opening a visit means for a given role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOpenMode {
    /// The consultation flow: fill clinical data, prescribe, bill.
    Consultation,
    /// Read-only details view.
    ReadOnly,
}

/// Clinicians land in the consultation flow for booked visits and may
/// re-enter completed ones to edit; everyone else gets the details view.
pub fn open_mode(role: Role, status: VisitStatus) -> VisitOpenMode {
    match status {
        VisitStatus::Booked if permitted(role, StaffAction::CompleteConsultation) => {
            VisitOpenMode::Consultation
        }
        VisitStatus::Completed if permitted(role, StaffAction::EditCompletedVisit) => {
            VisitOpenMode::Consultation
        }
        _ => VisitOpenMode::ReadOnly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booked_advances_only_to_completed() {
        assert!(can_transition(VisitStatus::Booked, VisitStatus::Completed));
        assert!(!can_transition(VisitStatus::Booked, VisitStatus::Booked));
        assert!(!can_transition(
            VisitStatus::Completed,
            VisitStatus::Booked
        ));
    }

    #[test]
    fn completed_may_be_resaved() {
        assert!(can_transition(
            VisitStatus::Completed,
            VisitStatus::Completed
        ));
    }

    #[test]
    fn in_progress_is_reserved() {
        for status in [
            VisitStatus::Booked,
            VisitStatus::InProgress,
            VisitStatus::Completed,
        ] {
            assert!(!can_transition(status, VisitStatus::InProgress));
            assert!(!can_transition(VisitStatus::InProgress, status));
        }
    }

    #[test]
    fn reception_cannot_complete_consultations() {
        assert!(!permitted(
            Role::Reception,
            StaffAction::CompleteConsultation
        ));
        assert!(permitted(Role::Doctor, StaffAction::CompleteConsultation));
        assert!(permitted(Role::Admin, StaffAction::CompleteConsultation));
    }

    #[test]
    fn everyone_books_and_takes_payments() {
        for role in [Role::Admin, Role::Doctor, Role::Reception] {
            assert!(permitted(role, StaffAction::BookVisit));
            assert!(permitted(role, StaffAction::RecordPayment));
            assert!(permitted(role, StaffAction::RegisterPatient));
        }
    }

    #[test]
    fn only_admin_manages_users() {
        assert!(permitted(Role::Admin, StaffAction::ManageUsers));
        assert!(!permitted(Role::Doctor, StaffAction::ManageUsers));
        assert!(!permitted(Role::Reception, StaffAction::ManageUsers));
    }

    #[test]
    fn ensure_permitted_fails_closed() {
        let err = ensure_permitted(Role::Reception, StaffAction::ManageCatalog).unwrap_err();
        assert!(matches!(err, WorkflowError::NotPermitted { .. }));
    }

    #[test]
    fn open_mode_by_role_and_status() {
        assert_eq!(
            open_mode(Role::Doctor, VisitStatus::Booked),
            VisitOpenMode::Consultation
        );
        assert_eq!(
            open_mode(Role::Reception, VisitStatus::Booked),
            VisitOpenMode::ReadOnly
        );
        assert_eq!(
            open_mode(Role::Admin, VisitStatus::Completed),
            VisitOpenMode::Consultation
        );
        assert_eq!(
            open_mode(Role::Reception, VisitStatus::Completed),
            VisitOpenMode::ReadOnly
        );
    }
}
