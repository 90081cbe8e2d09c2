use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bill::Bill;
use super::enums::VisitStatus;

/// One clinical encounter for a patient. Created in `booked` state by the
/// booking workflow; clinical fields and treatment lines are filled in by
/// consultation completion, which moves it to `completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: String,
    pub patient_id: String,
    pub date: NaiveDate,
    pub doctor_name: String,
    #[serde(default)]
    pub clinical_history: String,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub treatment_plan: String,
    #[serde(default)]
    pub investigations: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Attachment URLs as served by the backend.
    #[serde(default)]
    pub attachments: Vec<String>,
    pub status: VisitStatus,
    /// Fee charged (or waived to zero) at booking, whole rupees.
    pub consultation_fee: i64,
    /// Whether the consultation fee was settled at booking.
    pub is_paid: bool,
    /// Grand total plus consultation fee, as recorded by the backend.
    pub total_amount: i64,
    pub amount_paid: i64,
    /// Prescribed treatment line items with price snapshots.
    #[serde(default)]
    pub treatments: Vec<VisitTreatment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill: Option<Bill>,
}

/// A treatment prescribed on a visit. `cost_per_sitting` is snapshotted at
/// selection time and must never track later catalog price changes;
/// historical bills stay as issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitTreatment {
    #[serde(rename = "treatmentId")]
    pub treatment_id: String,
    #[serde(rename = "treatmentTitle", default)]
    pub treatment_title: String,
    pub sittings: u32,
    pub cost_per_sitting: i64,
}

impl VisitTreatment {
    /// Line total in whole rupees.
    pub fn line_total(&self) -> i64 {
        self.cost_per_sitting * i64::from(self.sittings)
    }
}

/// Payload for `POST /visits`: a booking. Clinical fields start empty,
/// totals are initialized to the consultation fee (charged in full or
/// waived to zero, never partially).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitDraft {
    pub patient_id: String,
    pub date: NaiveDate,
    pub doctor_name: String,
    pub consultation_fee: i64,
    pub is_paid: bool,
    pub status: VisitStatus,
    pub total_amount: i64,
    pub amount_paid: i64,
    pub clinical_history: String,
    pub diagnosis: String,
    pub treatment_plan: String,
    pub investigations: String,
}

/// Payload for `PATCH /visits/{id}`: consultation completion. Paid
/// amounts are deliberately absent: the payment ledger endpoint is the
/// only writer of those.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitUpdate {
    pub clinical_history: String,
    pub diagnosis: String,
    pub treatment_plan: String,
    pub investigations: String,
    pub notes: String,
    pub status: VisitStatus,
    /// Backend keeps this key in snake_case.
    #[serde(rename = "visit_treatments")]
    pub visit_treatments: Vec<VisitTreatment>,
    pub total_amount: i64,
}

/// An attachment (case sheet, report, registration document) staged for
/// upload. Size is validated before any network call.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl AttachmentUpload {
    pub fn validate(&self) -> Result<(), crate::error::ValidationError> {
        if self.bytes.len() > crate::config::MAX_ATTACHMENT_BYTES {
            return Err(crate::error::ValidationError::AttachmentTooLarge {
                name: self.file_name.clone(),
                size: self.bytes.len(),
                limit: crate::config::MAX_ATTACHMENT_BYTES,
            });
        }
        Ok(())
    }
}
