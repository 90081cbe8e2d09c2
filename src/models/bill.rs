use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{BillStatus, PaymentMode};

/// One entry in a bill's payment ledger. Append-only: once accepted it is
/// never edited or removed, only offset by further entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    /// Whole rupees, always > 0.
    pub amount: i64,
    pub date: DateTime<Utc>,
    pub mode: PaymentMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
}

impl Payment {
    /// New ledger entry with a client-generated id and the current time.
    /// The server echo remains authoritative for both.
    pub fn new(amount: i64, mode: PaymentMode, receiver: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            amount,
            date: Utc::now(),
            mode,
            receiver,
        }
    }
}

/// The financial record derived from a completed visit.
///
/// Invariant: `balance = grand_total - total_paid` at all times, and
/// `status` is a pure function of the balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub bill_number: String,
    /// Treatment total minus discount, whole rupees. Not clamped at zero.
    pub grand_total: i64,
    pub status: BillStatus,
    pub payments: Vec<Payment>,
    pub total_paid: i64,
    pub balance: i64,
}

impl Bill {
    /// Fresh bill for a grand total, empty ledger.
    pub fn for_total(grand_total: i64) -> Self {
        let mut bill = Self {
            bill_number: format!("BILL-{}", Uuid::new_v4().simple()),
            grand_total,
            status: BillStatus::Unpaid,
            payments: Vec::new(),
            total_paid: 0,
            balance: grand_total,
        };
        bill.recompute();
        bill
    }

    /// Bill for a (re)completed visit: new grand total, existing ledger
    /// preserved. Re-saving a consultation never touches payments.
    pub fn regenerate(previous: Option<&Bill>, grand_total: i64) -> Self {
        match previous {
            Some(prev) => {
                let mut bill = prev.clone();
                bill.grand_total = grand_total;
                bill.recompute();
                bill
            }
            None => Self::for_total(grand_total),
        }
    }

    /// `balance <= 0` → paid, `0 < balance < grand_total` → partially paid,
    /// otherwise unpaid.
    pub fn derive_status(grand_total: i64, balance: i64) -> BillStatus {
        if balance <= 0 {
            BillStatus::Paid
        } else if balance < grand_total {
            BillStatus::PartiallyPaid
        } else {
            BillStatus::Unpaid
        }
    }

    /// Re-derive totals, balance and status from the ledger.
    pub fn recompute(&mut self) {
        self.total_paid = self.payments.iter().map(|p| p.amount).sum();
        self.balance = self.grand_total - self.total_paid;
        self.status = Self::derive_status(self.grand_total, self.balance);
    }

    /// Copy of this bill with one more ledger entry applied. Used for the
    /// optimistic local view; the server's echo replaces it wholesale.
    pub fn with_payment(&self, payment: Payment) -> Self {
        let mut bill = self.clone();
        bill.payments.push(payment);
        bill.recompute();
        bill
    }
}
