//! `/patients`: registration and lookup.

use reqwest::Method;
use serde_json::json;

use crate::api::error::{ConflictError, PersistenceError, RegistrationError};
use crate::api::types::{ConflictBody, RequestBody};
use crate::api::ApiClient;
use crate::models::{NewPatient, Patient};

/// Fuzzy lookup by name, mobile or registration number. An empty query
/// returns the most recent registrations.
pub async fn search_patients(
    client: &ApiClient,
    query: &str,
) -> Result<Vec<Patient>, PersistenceError> {
    let response = client
        .execute(Method::GET, "/patients/", &[("search", query)], None)
        .await?;
    ApiClient::parse_json(response).await
}

pub async fn get_patient(client: &ApiClient, id: &str) -> Result<Patient, PersistenceError> {
    let path = format!("/patients/{id}/");
    let response = client.execute(Method::GET, &path, &[], None).await?;
    ApiClient::parse_json(response).await
}

/// Register a patient. JSON when there is no registration document,
/// multipart when there is; the variant is chosen here, once.
///
/// A duplicate mobile number comes back as [`RegistrationError::Conflict`]
/// carrying the existing record's id so the caller can navigate there
/// instead of creating a duplicate.
pub async fn create_patient(
    client: &ApiClient,
    new: &NewPatient,
) -> Result<Patient, RegistrationError> {
    let body = registration_body(new);
    let response = client
        .execute_raw(Method::POST, "/patients/", &[], Some(body))
        .await
        .map_err(RegistrationError::Persistence)?;

    if response.status() == reqwest::StatusCode::CONFLICT {
        let conflict: ConflictBody = ApiClient::parse_json(response)
            .await
            .unwrap_or(ConflictBody {
                existing_patient_id: None,
            });
        return Err(ConflictError::DuplicatePatient {
            mobile: new.mobile.clone(),
            existing_id: conflict.existing_patient_id.unwrap_or_default(),
        }
        .into());
    }

    let response = ApiClient::check_status(response, "/patients/")
        .await
        .map_err(RegistrationError::Persistence)?;
    ApiClient::parse_json(response)
        .await
        .map_err(RegistrationError::Persistence)
}

fn registration_body(new: &NewPatient) -> RequestBody {
    match &new.registration_document {
        None => RequestBody::Json(json!({
            "name": new.name,
            "mobile": new.mobile,
            "altMobile": new.alt_mobile,
            "age": new.age,
            "sex": new.sex.as_str(),
            "address": new.address,
            "regNo": new.reg_no,
            "firstVisitDate": new.first_visit_date,
            "bloodGroup": new.blood_group,
        })),
        Some(doc) => {
            let mut fields = vec![
                ("name".to_string(), new.name.clone()),
                ("mobile".to_string(), new.mobile.clone()),
                ("age".to_string(), new.age.to_string()),
                ("sex".to_string(), new.sex.as_str().to_string()),
                ("address".to_string(), new.address.clone()),
                ("regNo".to_string(), new.reg_no.clone()),
                ("firstVisitDate".to_string(), new.first_visit_date.clone()),
            ];
            if let Some(alt) = &new.alt_mobile {
                fields.push(("altMobile".to_string(), alt.clone()));
            }
            if let Some(group) = &new.blood_group {
                fields.push(("bloodGroup".to_string(), group.clone()));
            }
            RequestBody::Multipart {
                fields,
                files: vec![("registration_document".to_string(), doc.clone())],
            }
        }
    }
}
