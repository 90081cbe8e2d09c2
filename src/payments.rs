//! Payment ledger workflow.
//!
//! Payments are append-only: once accepted an entry is never edited or
//! removed. The client applies the payment optimistically for immediate
//! display, then replaces that view wholesale with the server's
//! authoritative bill; replacement, not merging, is what makes a late or
//! out-of-order echo safe from double counting. A failed request rolls
//! back to the pre-payment bill, which the caller still holds.

use serde::Serialize;

use crate::api::ClinicBackend;
use crate::error::{ValidationError, WorkflowError};
use crate::inflight::{InflightGuards, SubmitKind};
use crate::lifecycle::{self, StaffAction};
use crate::models::{Bill, Payment, PaymentMode, Role};
use crate::notify::Notifier;

/// Wire payload for `POST /visits/{id}/add_payment`.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    /// Whole rupees, must be > 0.
    pub amount: i64,
    pub mode: PaymentMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
}

impl PaymentRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= 0 {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}

/// Both views of the bill after a successful payment: the optimistic one
/// the UI showed immediately, and the authoritative one from the server
/// that replaced it.
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub optimistic: Bill,
    pub settled: Bill,
}

/// The bill as it should display while the request is in flight. Hosts
/// apply this before awaiting [`record_payment`]; the settled bill from
/// the server replaces it on success, and the pre-payment `bill` is
/// restored on failure.
pub fn optimistic_bill(bill: &Bill, request: &PaymentRequest) -> Bill {
    bill.with_payment(Payment::new(
        request.amount,
        request.mode,
        request.receiver.clone(),
    ))
}

/// Record a payment against a visit's bill.
///
/// On error the caller's `bill` is untouched; keeping it IS the rollback
/// of the optimistic update.
pub async fn record_payment<B: ClinicBackend>(
    backend: &B,
    role: Role,
    visit_id: &str,
    bill: &Bill,
    request: PaymentRequest,
    guards: &InflightGuards,
    notifier: &Notifier,
) -> Result<PaymentOutcome, WorkflowError> {
    lifecycle::ensure_permitted(role, StaffAction::RecordPayment)?;
    request.validate()?;

    let _ticket = guards
        .try_begin(SubmitKind::Payment)
        .ok_or(WorkflowError::SubmissionInFlight(SubmitKind::Payment))?;

    // Same view a host computes via `optimistic_bill` for immediate
    // display; the server echo supersedes it.
    let optimistic = optimistic_bill(bill, &request);
    tracing::debug!(
        %visit_id,
        amount = request.amount,
        mode = %request.mode,
        optimistic_balance = optimistic.balance,
        "payment applied optimistically"
    );

    let settled = match backend.add_payment(visit_id, &request).await {
        Ok(settled) => settled,
        Err(err) => {
            tracing::warn!(%visit_id, "payment write failed, optimistic update rolled back");
            notifier.error("Failed to record payment");
            return Err(err.into());
        }
    };

    notifier.success(format!("Payment of ₹{} recorded", request.amount));
    Ok(PaymentOutcome { optimistic, settled })
}
