use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::ValidationError;

use super::enums::Sex;
use super::visit::AttachmentUpload;

fn mobile_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{10}$").expect("static regex"))
}

/// A registered patient. Identity (id, reg_no, first_visit_date) is
/// immutable; demographics may change. Patients with visits are never
/// deleted; the backend enforces the referential side, the client simply
/// offers no delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub mobile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_mobile: Option<String>,
    pub age: u32,
    pub sex: Sex,
    pub address: String,
    pub reg_no: String,
    /// YYYY-MM-DD, set at registration.
    pub first_visit_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    /// URL of the uploaded registration document, if any.
    #[serde(
        default,
        rename = "registration_document",
        skip_serializing_if = "Option::is_none"
    )]
    pub registration_document: Option<String>,
}

/// Registration payload. The optional registration document (Aadhaar,
/// insurance card) turns the create call into a multipart request; that
/// decision is made once, at the API boundary.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: String,
    pub mobile: String,
    pub alt_mobile: Option<String>,
    pub age: u32,
    pub sex: Sex,
    pub address: String,
    pub reg_no: String,
    pub first_visit_date: String,
    pub blood_group: Option<String>,
    pub registration_document: Option<AttachmentUpload>,
}

impl NewPatient {
    /// Validate before any network call is made.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.reg_no.trim().is_empty() {
            return Err(ValidationError::MissingField("regNo"));
        }
        if self.address.trim().is_empty() {
            return Err(ValidationError::MissingField("address"));
        }
        if !mobile_regex().is_match(&self.mobile) {
            return Err(ValidationError::InvalidMobile(self.mobile.clone()));
        }
        if let Some(alt) = &self.alt_mobile {
            if !mobile_regex().is_match(alt) {
                return Err(ValidationError::InvalidMobile(alt.clone()));
            }
        }
        if let Some(doc) = &self.registration_document {
            if doc.bytes.len() > config::MAX_ATTACHMENT_BYTES {
                return Err(ValidationError::AttachmentTooLarge {
                    name: doc.file_name.clone(),
                    size: doc.bytes.len(),
                    limit: config::MAX_ATTACHMENT_BYTES,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_patient() -> NewPatient {
        NewPatient {
            name: "Rajesh Kumar".into(),
            mobile: "9876543210".into(),
            alt_mobile: None,
            age: 45,
            sex: Sex::Male,
            address: "123 Temple Road, Indiranagar".into(),
            reg_no: "SD-2023-001".into(),
            first_visit_date: "2023-01-15".into(),
            blood_group: Some("O+".into()),
            registration_document: None,
        }
    }

    #[test]
    fn valid_patient_passes() {
        assert!(new_patient().validate().is_ok());
    }

    #[test]
    fn short_mobile_is_rejected() {
        let mut p = new_patient();
        p.mobile = "12345".into();
        assert_eq!(
            p.validate().unwrap_err(),
            ValidationError::InvalidMobile("12345".into())
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut p = new_patient();
        p.name = "  ".into();
        assert_eq!(
            p.validate().unwrap_err(),
            ValidationError::MissingField("name")
        );
    }

    #[test]
    fn oversized_document_is_rejected() {
        let mut p = new_patient();
        p.registration_document = Some(AttachmentUpload {
            file_name: "aadhaar.pdf".into(),
            content_type: Some("application/pdf".into()),
            bytes: vec![0u8; crate::config::MAX_ATTACHMENT_BYTES + 1],
        });
        assert!(matches!(
            p.validate().unwrap_err(),
            ValidationError::AttachmentTooLarge { .. }
        ));
    }

    #[test]
    fn patient_wire_shape_is_camel_case() {
        let p = Patient {
            id: "1".into(),
            name: "Priya Sharma".into(),
            mobile: "9123456780".into(),
            alt_mobile: None,
            age: 32,
            sex: Sex::Female,
            address: "45 Green Park".into(),
            reg_no: "SD-2023-045".into(),
            first_visit_date: "2023-03-22".into(),
            blood_group: None,
            registration_document: None,
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["regNo"], "SD-2023-045");
        assert_eq!(json["firstVisitDate"], "2023-03-22");
        assert!(json.get("reg_no").is_none());
    }
}
