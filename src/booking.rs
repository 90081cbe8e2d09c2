//! Booking workflow: create a visit in `booked` state, charging the
//! consultation fee in full or waiving it for a follow-up.
//!
//! Booking never takes a partial fee: `amount_paid` equals the fee, and
//! `is_paid` is true either way. Printing the fee receipt when
//! `amount_paid > 0` is the caller's job.

use chrono::NaiveDate;

use crate::api::ClinicBackend;
use crate::billing::{self, FeeDecision};
use crate::error::{ValidationError, WorkflowError};
use crate::inflight::{InflightGuards, SubmitKind};
use crate::lifecycle::{self, StaffAction};
use crate::models::{Patient, Role, Visit, VisitDraft, VisitStatus};
use crate::notify::Notifier;

/// Form state for booking a consultation.
#[derive(Debug, Clone)]
pub struct BookingForm {
    pub date: NaiveDate,
    pub doctor_name: String,
}

/// A completed booking. `fee` tells the caller whether to print a receipt
/// and whether to show the waiver banner.
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub visit: Visit,
    pub fee: FeeDecision,
}

/// Book a new visit for a patient.
///
/// `last_visit` is the date of the patient's most recent prior visit, if
/// any; `today` anchors the waiver-window check. Validation failures are
/// raised before any network call.
pub async fn book_visit<B: ClinicBackend>(
    backend: &B,
    role: Role,
    patient: Option<&Patient>,
    last_visit: Option<NaiveDate>,
    today: NaiveDate,
    form: &BookingForm,
    guards: &InflightGuards,
    notifier: &Notifier,
) -> Result<BookingOutcome, WorkflowError> {
    lifecycle::ensure_permitted(role, StaffAction::BookVisit)?;

    // Validation comes before the guard: a rejected form never consumes
    // the submission slot.
    let patient = patient.ok_or(ValidationError::MissingPatient)?;
    if form.doctor_name.trim().is_empty() {
        return Err(ValidationError::MissingField("doctorName").into());
    }

    let _ticket = guards
        .try_begin(SubmitKind::Booking)
        .ok_or(WorkflowError::SubmissionInFlight(SubmitKind::Booking))?;

    let fee = billing::consultation_fee(last_visit, today);
    let draft = VisitDraft {
        patient_id: patient.id.clone(),
        date: form.date,
        doctor_name: form.doctor_name.clone(),
        consultation_fee: fee.fee,
        is_paid: true,
        status: VisitStatus::Booked,
        total_amount: fee.fee,
        amount_paid: fee.fee,
        clinical_history: String::new(),
        diagnosis: String::new(),
        treatment_plan: String::new(),
        investigations: String::new(),
    };

    let visit = match backend.create_visit(&draft).await {
        Ok(visit) => visit,
        Err(err) => {
            notifier.error("Failed to book consultation");
            return Err(err.into());
        }
    };

    tracing::info!(
        visit_id = %visit.id,
        patient_id = %patient.id,
        fee = fee.fee,
        waived = fee.waived,
        "visit booked"
    );
    if fee.waived {
        notifier.success("Consultation booked, fee waived (follow-up within 10 days)");
    } else {
        notifier.success(format!("Consultation booked, ₹{} collected", fee.fee));
    }

    Ok(BookingOutcome { visit, fee })
}
