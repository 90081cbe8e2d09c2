//! Consultation completion: clinical data, prescribed treatments, and the
//! generated bill.
//!
//! Re-running completion on an already-completed visit is a privileged
//! edit with idempotent effect: totals are recomputed from current form
//! state, clinical fields and treatment lines are overwritten, and the
//! payment ledger is never touched.

use crate::api::ClinicBackend;
use crate::billing::{BillingBreakdown, TreatmentSelection};
use crate::error::WorkflowError;
use crate::inflight::{InflightGuards, SubmitKind};
use crate::lifecycle::{self, StaffAction};
use crate::models::{AttachmentUpload, Bill, Role, Visit, VisitStatus, VisitUpdate};
use crate::notify::Notifier;

/// Form state of the consultation screen.
#[derive(Debug, Clone, Default)]
pub struct ConsultationForm {
    pub clinical_history: String,
    pub diagnosis: String,
    pub investigations: String,
    pub notes: String,
    /// Treatment rows with their selection-time price snapshots.
    pub lines: Vec<TreatmentSelection>,
    /// Flat discount in whole rupees; never clamped against the total.
    pub discount: i64,
    pub attachment: Option<AttachmentUpload>,
}

/// Result of a successful completion.
#[derive(Debug, Clone)]
pub struct ConsultationOutcome {
    pub visit: Visit,
    pub bill: Bill,
    pub breakdown: BillingBreakdown,
}

/// Complete (or re-edit) a consultation, generating the bill.
///
/// The visit is persisted first; the optional attachment is uploaded
/// second. If only the upload fails the error carries the saved visit so
/// the caller retries just that step via [`retry_attachment`].
pub async fn complete_consultation<B: ClinicBackend>(
    backend: &B,
    role: Role,
    visit: &Visit,
    form: &ConsultationForm,
    guards: &InflightGuards,
    notifier: &Notifier,
) -> Result<ConsultationOutcome, WorkflowError> {
    let action = if visit.status == VisitStatus::Completed {
        StaffAction::EditCompletedVisit
    } else {
        StaffAction::CompleteConsultation
    };
    lifecycle::ensure_permitted(role, action)?;
    lifecycle::ensure_transition(visit.status, VisitStatus::Completed)?;

    // Validation comes before the guard: a rejected form never consumes
    // the submission slot.
    if let Some(attachment) = &form.attachment {
        attachment.validate()?;
    }
    let breakdown = BillingBreakdown::compute(&form.lines, form.discount, visit.consultation_fee)?;

    let _ticket = guards
        .try_begin(SubmitKind::Consultation)
        .ok_or(WorkflowError::SubmissionInFlight(SubmitKind::Consultation))?;

    let update = VisitUpdate {
        clinical_history: form.clinical_history.clone(),
        diagnosis: form.diagnosis.clone(),
        treatment_plan: treatment_plan_summary(&form.lines),
        investigations: form.investigations.clone(),
        notes: form.notes.clone(),
        status: VisitStatus::Completed,
        visit_treatments: form
            .lines
            .iter()
            .cloned()
            .map(TreatmentSelection::into_line)
            .collect(),
        total_amount: breakdown.total_amount,
    };

    let updated = match backend.update_visit(&visit.id, &update).await {
        Ok(updated) => updated,
        Err(err) => {
            notifier.error("Failed to save consultation");
            return Err(err.into());
        }
    };

    // Prefer the server's bill; fall back to a local regeneration that
    // preserves whatever ledger we already knew about.
    let bill = updated
        .bill
        .clone()
        .unwrap_or_else(|| Bill::regenerate(visit.bill.as_ref(), breakdown.grand_total));

    if let Some(attachment) = &form.attachment {
        if let Err(err) = backend.upload_attachment(&updated.id, attachment).await {
            tracing::warn!(visit_id = %updated.id, "attachment upload failed after save");
            notifier.warning("Consultation saved, but the attachment upload failed. Retry the upload");
            return Err(WorkflowError::AttachmentUpload {
                visit: Box::new(updated),
                source: err,
            });
        }
    }

    tracing::info!(
        visit_id = %updated.id,
        grand_total = breakdown.grand_total,
        lines = form.lines.len(),
        "consultation completed"
    );
    notifier.success("Consultation finalized & Bill generated");

    Ok(ConsultationOutcome {
        visit: updated,
        bill,
        breakdown,
    })
}

/// Retry just the attachment upload after a partial failure.
pub async fn retry_attachment<B: ClinicBackend>(
    backend: &B,
    visit_id: &str,
    attachment: &AttachmentUpload,
    guards: &InflightGuards,
    notifier: &Notifier,
) -> Result<(), WorkflowError> {
    attachment.validate()?;
    let _ticket = guards
        .try_begin(SubmitKind::AttachmentRetry)
        .ok_or(WorkflowError::SubmissionInFlight(SubmitKind::AttachmentRetry))?;

    match backend.upload_attachment(visit_id, attachment).await {
        Ok(()) => {
            notifier.success("Attachment uploaded");
            Ok(())
        }
        Err(err) => {
            notifier.error("Attachment upload failed");
            Err(err.into())
        }
    }
}

/// Human-readable plan line, e.g. "Janu Basti (7 sittings), Nasya (3 sittings)".
fn treatment_plan_summary(lines: &[TreatmentSelection]) -> String {
    lines
        .iter()
        .map(|l| format!("{} ({} sittings)", l.treatment_title, l.sittings))
        .collect::<Vec<_>>()
        .join(", ")
}
