//! Patient registration.
//!
//! Identity fields are validated before any network call; a duplicate
//! mobile number comes back as a conflict carrying the existing record's
//! id, so the front desk can jump to that patient instead of creating a
//! second one.

use crate::api::ClinicBackend;
use crate::error::WorkflowError;
use crate::inflight::{InflightGuards, SubmitKind};
use crate::lifecycle::{self, StaffAction};
use crate::models::{NewPatient, Patient, Role};
use crate::notify::Notifier;

/// Register a new patient.
pub async fn register_patient<B: ClinicBackend>(
    backend: &B,
    role: Role,
    new: &NewPatient,
    guards: &InflightGuards,
    notifier: &Notifier,
) -> Result<Patient, WorkflowError> {
    lifecycle::ensure_permitted(role, StaffAction::RegisterPatient)?;
    new.validate()?;

    let _ticket = guards
        .try_begin(SubmitKind::Registration)
        .ok_or(WorkflowError::SubmissionInFlight(SubmitKind::Registration))?;

    let patient = match backend.register_patient(new).await {
        Ok(patient) => patient,
        Err(err) => {
            let err = WorkflowError::from(err);
            if let WorkflowError::Conflict(conflict) = &err {
                tracing::info!(mobile = %new.mobile, "duplicate registration refused");
                notifier.warning(conflict.to_string());
            } else {
                notifier.error("Failed to register patient");
            }
            return Err(err);
        }
    };

    tracing::info!(patient_id = %patient.id, reg_no = %patient.reg_no, "patient registered");
    notifier.success(format!("Patient {} registered", patient.name));
    Ok(patient)
}
