//! In-memory stand-in for the clinic backend, used by workflow tests.
//!
//! Mirrors the server's observable behavior: id assignment, bill
//! regeneration that preserves the payment ledger, and authoritative
//! payment application. Failure flags let tests exercise persistence
//! errors and partial failures.

use std::collections::HashMap;
use std::sync::Mutex;

use super::error::{ConflictError, PersistenceError, RegistrationError};
use super::{CatalogBackend, ClinicBackend, StaffDirectory};
use crate::models::{
    AttachmentUpload, Bill, NewPatient, NewTreatment, NewUser, Patient, Payment, Treatment,
    TreatmentUpdate, User, UserUpdate, Visit, VisitDraft, VisitStatus, VisitUpdate,
};
use crate::payments::PaymentRequest;

#[derive(Default)]
pub struct FakeState {
    pub patients: HashMap<String, Patient>,
    pub visits: HashMap<String, Visit>,
    pub bills: HashMap<String, Bill>,
    pub treatments: HashMap<String, Treatment>,
    pub users: HashMap<String, User>,
    pub uploads: Vec<(String, String)>,
    pub next_id: u32,
    pub fail_register: bool,
    pub fail_create: bool,
    pub fail_update: bool,
    pub fail_upload: bool,
    pub fail_payment: bool,
}

#[derive(Default)]
pub struct FakeBackend {
    pub state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visit(&self, id: &str) -> Option<Visit> {
        self.state.lock().unwrap().visits.get(id).cloned()
    }

    pub fn bill(&self, visit_id: &str) -> Option<Bill> {
        self.state.lock().unwrap().bills.get(visit_id).cloned()
    }

    fn server_error() -> PersistenceError {
        PersistenceError::Server {
            status: 500,
            body: "injected failure".into(),
        }
    }
}

impl ClinicBackend for FakeBackend {
    async fn register_patient(&self, new: &NewPatient) -> Result<Patient, RegistrationError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_register {
            return Err(RegistrationError::Persistence(Self::server_error()));
        }
        if let Some(existing) = state.patients.values().find(|p| p.mobile == new.mobile) {
            return Err(ConflictError::DuplicatePatient {
                mobile: new.mobile.clone(),
                existing_id: existing.id.clone(),
            }
            .into());
        }
        state.next_id += 1;
        let patient = Patient {
            id: format!("p{}", state.next_id),
            name: new.name.clone(),
            mobile: new.mobile.clone(),
            alt_mobile: new.alt_mobile.clone(),
            age: new.age,
            sex: new.sex,
            address: new.address.clone(),
            reg_no: new.reg_no.clone(),
            first_visit_date: new.first_visit_date.clone(),
            blood_group: new.blood_group.clone(),
            registration_document: new
                .registration_document
                .as_ref()
                .map(|doc| format!("https://files.example/patients/{}", doc.file_name)),
        };
        state.patients.insert(patient.id.clone(), patient.clone());
        Ok(patient)
    }

    async fn create_visit(&self, draft: &VisitDraft) -> Result<Visit, PersistenceError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create {
            return Err(Self::server_error());
        }
        state.next_id += 1;
        let id = format!("v{}", state.next_id);
        let visit = Visit {
            id: id.clone(),
            patient_id: draft.patient_id.clone(),
            date: draft.date,
            doctor_name: draft.doctor_name.clone(),
            clinical_history: draft.clinical_history.clone(),
            diagnosis: draft.diagnosis.clone(),
            treatment_plan: draft.treatment_plan.clone(),
            investigations: draft.investigations.clone(),
            notes: None,
            attachments: vec![],
            status: draft.status,
            consultation_fee: draft.consultation_fee,
            is_paid: draft.is_paid,
            total_amount: draft.total_amount,
            amount_paid: draft.amount_paid,
            treatments: vec![],
            bill: None,
        };
        state.visits.insert(id, visit.clone());
        Ok(visit)
    }

    async fn update_visit(
        &self,
        visit_id: &str,
        update: &VisitUpdate,
    ) -> Result<Visit, PersistenceError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_update {
            return Err(Self::server_error());
        }
        let Some(mut visit) = state.visits.get(visit_id).cloned() else {
            return Err(PersistenceError::NotFound(visit_id.to_string()));
        };

        visit.clinical_history = update.clinical_history.clone();
        visit.diagnosis = update.diagnosis.clone();
        visit.treatment_plan = update.treatment_plan.clone();
        visit.investigations = update.investigations.clone();
        visit.notes = Some(update.notes.clone());
        visit.status = update.status;
        visit.treatments = update.visit_treatments.clone();
        visit.total_amount = update.total_amount;

        if update.status == VisitStatus::Completed {
            let grand_total = update.total_amount - visit.consultation_fee;
            let bill = Bill::regenerate(state.bills.get(visit_id), grand_total);
            visit.amount_paid = visit.consultation_fee + bill.total_paid;
            visit.bill = Some(bill.clone());
            state.bills.insert(visit_id.to_string(), bill);
        }

        state.visits.insert(visit_id.to_string(), visit.clone());
        Ok(visit)
    }

    async fn upload_attachment(
        &self,
        visit_id: &str,
        file: &AttachmentUpload,
    ) -> Result<(), PersistenceError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_upload {
            return Err(Self::server_error());
        }
        if !state.visits.contains_key(visit_id) {
            return Err(PersistenceError::NotFound(visit_id.to_string()));
        }
        let url = format!("https://files.example/{visit_id}/{}", file.file_name);
        state.uploads.push((visit_id.to_string(), file.file_name.clone()));
        if let Some(visit) = state.visits.get_mut(visit_id) {
            visit.attachments.push(url);
        }
        Ok(())
    }

    async fn add_payment(
        &self,
        visit_id: &str,
        request: &PaymentRequest,
    ) -> Result<Bill, PersistenceError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_payment {
            return Err(Self::server_error());
        }
        let Some(bill) = state.bills.get(visit_id).cloned() else {
            return Err(PersistenceError::NotFound(visit_id.to_string()));
        };
        let bill = bill.with_payment(Payment::new(
            request.amount,
            request.mode,
            request.receiver.clone(),
        ));
        state.bills.insert(visit_id.to_string(), bill.clone());
        if let Some(visit) = state.visits.get_mut(visit_id) {
            visit.amount_paid = visit.consultation_fee + bill.total_paid;
            visit.bill = Some(bill.clone());
        }
        Ok(bill)
    }
}

impl CatalogBackend for FakeBackend {
    async fn create_treatment(&self, new: &NewTreatment) -> Result<Treatment, PersistenceError> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let treatment = Treatment {
            id: format!("t{}", state.next_id),
            title: new.title.clone(),
            description: new.description.clone(),
            image: new.image.clone().unwrap_or_default(),
            price: new.price,
        };
        state.treatments.insert(treatment.id.clone(), treatment.clone());
        Ok(treatment)
    }

    async fn update_treatment(
        &self,
        id: &str,
        update: &TreatmentUpdate,
    ) -> Result<Treatment, PersistenceError> {
        let mut state = self.state.lock().unwrap();
        let Some(treatment) = state.treatments.get_mut(id) else {
            return Err(PersistenceError::NotFound(id.to_string()));
        };
        if let Some(title) = &update.title {
            treatment.title = title.clone();
        }
        if let Some(description) = &update.description {
            treatment.description = description.clone();
        }
        if let Some(image) = &update.image {
            treatment.image = image.clone();
        }
        if let Some(price) = update.price {
            treatment.price = price;
        }
        Ok(treatment.clone())
    }

    async fn delete_treatment(&self, id: &str) -> Result<(), PersistenceError> {
        let mut state = self.state.lock().unwrap();
        state
            .treatments
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))
    }
}

impl StaffDirectory for FakeBackend {
    async fn create_user(&self, new: &NewUser) -> Result<User, PersistenceError> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let user = User {
            id: format!("u{}", state.next_id),
            name: new.name.clone(),
            email: new.email.clone(),
            role: new.role,
            avatar: new.avatar.clone(),
        };
        state.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<User, PersistenceError> {
        let mut state = self.state.lock().unwrap();
        let Some(user) = state.users.get_mut(id) else {
            return Err(PersistenceError::NotFound(id.to_string()));
        };
        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(avatar) = &update.avatar {
            user.avatar = Some(avatar.clone());
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, id: &str) -> Result<(), PersistenceError> {
        let mut state = self.state.lock().unwrap();
        state
            .users
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))
    }
}
