pub mod bill;
pub mod enums;
pub mod patient;
pub mod treatment;
pub mod user;
pub mod visit;

pub use bill::{Bill, Payment};
pub use enums::{BillStatus, PaymentMode, Role, Sex, VisitStatus};
pub use patient::{NewPatient, Patient};
pub use treatment::{NewTreatment, Treatment, TreatmentUpdate};
pub use user::{NewUser, User, UserUpdate};
pub use visit::{AttachmentUpload, Visit, VisitDraft, VisitTreatment, VisitUpdate};
