//! Consultation fee waiver and treatment billing arithmetic.
//!
//! Everything here is pure: the booking and consultation workflows feed
//! form state in and persist the results through the API boundary. Two
//! rules are deliberate and must not be "fixed":
//!
//! - `cost_per_sitting` is snapshotted when a line is selected from the
//!   catalog; later catalog price changes never reprice an existing line.
//! - The discount is a flat subtraction with no clamping, so a grand total
//!   can go negative.

use chrono::NaiveDate;

use crate::config::{FEE_WAIVER_WINDOW_DAYS, STANDARD_CONSULTATION_FEE};
use crate::error::ValidationError;
use crate::models::{Treatment, VisitTreatment};

// ─── Fee waiver ───────────────────────────────────────────────────────────────

/// Outcome of the booking-time fee decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeDecision {
    /// Whole rupees: the standard fee, or zero when waived.
    pub fee: i64,
    /// True when this is a free follow-up within the waiver window.
    pub waived: bool,
}

/// Decide the consultation fee for a new booking.
///
/// First visit (no prior date) charges the standard fee. Otherwise a
/// revisit within [`FEE_WAIVER_WINDOW_DAYS`] of the last visit is a free
/// follow-up; exactly on the boundary still counts as waived.
pub fn consultation_fee(last_visit: Option<NaiveDate>, today: NaiveDate) -> FeeDecision {
    let Some(last) = last_visit else {
        return FeeDecision {
            fee: STANDARD_CONSULTATION_FEE,
            waived: false,
        };
    };

    let diff_days = (today - last).num_days().abs();
    if diff_days <= FEE_WAIVER_WINDOW_DAYS {
        tracing::debug!(diff_days, "consultation fee waived, follow-up visit");
        FeeDecision {
            fee: 0,
            waived: true,
        }
    } else {
        FeeDecision {
            fee: STANDARD_CONSULTATION_FEE,
            waived: false,
        }
    }
}

// ─── Treatment lines ──────────────────────────────────────────────────────────

/// A treatment row as selected on the consultation form, carrying the
/// price snapshot taken at selection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatmentSelection {
    pub treatment_id: String,
    pub treatment_title: String,
    pub sittings: u32,
    pub cost_per_sitting: i64,
}

impl TreatmentSelection {
    /// New row from the live catalog; this is the moment the price is
    /// snapshotted.
    pub fn from_catalog(treatment: &Treatment, sittings: u32) -> Self {
        Self {
            treatment_id: treatment.id.clone(),
            treatment_title: treatment.title.clone(),
            sittings,
            cost_per_sitting: treatment.price,
        }
    }

    /// Row restored from an already-saved visit line. Keeps the original
    /// snapshot so re-saving a visit never repriced old prescriptions.
    pub fn from_line(line: &VisitTreatment) -> Self {
        Self {
            treatment_id: line.treatment_id.clone(),
            treatment_title: line.treatment_title.clone(),
            sittings: line.sittings,
            cost_per_sitting: line.cost_per_sitting,
        }
    }

    pub fn line_total(&self) -> i64 {
        self.cost_per_sitting * i64::from(self.sittings)
    }

    /// Wire form for the visit update payload.
    pub fn into_line(self) -> VisitTreatment {
        VisitTreatment {
            treatment_id: self.treatment_id,
            treatment_title: self.treatment_title,
            sittings: self.sittings,
            cost_per_sitting: self.cost_per_sitting,
        }
    }
}

/// Sum of line totals over all selected treatments.
pub fn treatment_total(lines: &[TreatmentSelection]) -> i64 {
    lines.iter().map(TreatmentSelection::line_total).sum()
}

// ─── Breakdown ────────────────────────────────────────────────────────────────

/// The consultation bill as shown to the clinician, plus the amount
/// persisted to the backend. The consultation fee from booking is hidden
/// from the visual breakdown but added back for the backend record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingBreakdown {
    pub treatment_total: i64,
    pub discount: i64,
    /// `treatment_total - discount`. May be negative; not clamped.
    pub grand_total: i64,
    pub consultation_fee: i64,
    /// `grand_total + consultation_fee`, persisted as the visit's total.
    pub total_amount: i64,
}

impl BillingBreakdown {
    pub fn compute(
        lines: &[TreatmentSelection],
        discount: i64,
        consultation_fee: i64,
    ) -> Result<Self, ValidationError> {
        if discount < 0 {
            return Err(ValidationError::NegativeDiscount(discount));
        }
        if lines.iter().any(|l| l.sittings == 0) {
            return Err(ValidationError::ZeroSittings);
        }

        let treatment_total = treatment_total(lines);
        let grand_total = treatment_total - discount;
        Ok(Self {
            treatment_total,
            discount,
            grand_total,
            consultation_fee,
            total_amount: grand_total + consultation_fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn line(id: &str, price: i64, sittings: u32) -> TreatmentSelection {
        TreatmentSelection {
            treatment_id: id.into(),
            treatment_title: format!("Treatment {id}"),
            sittings,
            cost_per_sitting: price,
        }
    }

    #[test]
    fn first_visit_charges_standard_fee() {
        let decision = consultation_fee(None, date(2025, 3, 1));
        assert_eq!(decision.fee, 500);
        assert!(!decision.waived);
    }

    #[test]
    fn revisit_within_window_is_waived() {
        let decision = consultation_fee(Some(date(2025, 2, 24)), date(2025, 3, 1));
        assert_eq!(decision.fee, 0);
        assert!(decision.waived);
    }

    #[test]
    fn waiver_boundary_at_ten_and_eleven_days() {
        let today = date(2025, 3, 11);
        let ten_days = consultation_fee(Some(date(2025, 3, 1)), today);
        assert!(ten_days.waived);
        let eleven_days = consultation_fee(Some(date(2025, 2, 28)), today);
        assert!(!eleven_days.waived);
        assert_eq!(eleven_days.fee, 500);
    }

    #[test]
    fn snapshot_is_taken_from_catalog_at_selection() {
        let mut treatment = Treatment {
            id: "t1".into(),
            title: "Janu Basti".into(),
            description: String::new(),
            image: String::new(),
            price: 200,
        };
        let selection = TreatmentSelection::from_catalog(&treatment, 7);

        // Catalog price change after selection must not reprice the line.
        treatment.price = 900;
        assert_eq!(selection.cost_per_sitting, 200);
        assert_eq!(selection.line_total(), 1400);
    }

    #[test]
    fn restored_line_keeps_original_snapshot() {
        let saved = VisitTreatment {
            treatment_id: "t1".into(),
            treatment_title: "Janu Basti".into(),
            sittings: 7,
            cost_per_sitting: 150,
        };
        let selection = TreatmentSelection::from_line(&saved);
        assert_eq!(selection.cost_per_sitting, 150);
    }

    #[test]
    fn breakdown_matches_scenario() {
        // ₹200×7 + ₹100×3 with ₹50 discount → 1650.
        let lines = vec![line("t1", 200, 7), line("t2", 100, 3)];
        let breakdown = BillingBreakdown::compute(&lines, 50, 500).unwrap();
        assert_eq!(breakdown.treatment_total, 1700);
        assert_eq!(breakdown.grand_total, 1650);
        assert_eq!(breakdown.total_amount, 2150);
    }

    #[test]
    fn discount_is_not_clamped() {
        let lines = vec![line("t1", 100, 1)];
        let breakdown = BillingBreakdown::compute(&lines, 400, 0).unwrap();
        assert_eq!(breakdown.grand_total, -300);
    }

    #[test]
    fn empty_lines_total_zero() {
        let breakdown = BillingBreakdown::compute(&[], 0, 500).unwrap();
        assert_eq!(breakdown.treatment_total, 0);
        assert_eq!(breakdown.grand_total, 0);
        assert_eq!(breakdown.total_amount, 500);
    }

    #[test]
    fn negative_discount_is_rejected() {
        let err = BillingBreakdown::compute(&[], -1, 0).unwrap_err();
        assert_eq!(err, ValidationError::NegativeDiscount(-1));
    }

    #[test]
    fn zero_sittings_is_rejected() {
        let lines = vec![line("t1", 100, 0)];
        let err = BillingBreakdown::compute(&lines, 0, 0).unwrap_err();
        assert_eq!(err, ValidationError::ZeroSittings);
    }
}
