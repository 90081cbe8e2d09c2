//! `/visits`: booking, consultation updates, attachments, payments.

use reqwest::Method;

use crate::api::error::PersistenceError;
use crate::api::types::RequestBody;
use crate::api::ApiClient;
use crate::models::{AttachmentUpload, Bill, Visit, VisitDraft, VisitUpdate};
use crate::payments::PaymentRequest;

/// All visits for a patient, newest first (backend ordering).
pub async fn list_visits(
    client: &ApiClient,
    patient_id: &str,
) -> Result<Vec<Visit>, PersistenceError> {
    let response = client
        .execute(Method::GET, "/visits/", &[("patientId", patient_id)], None)
        .await?;
    ApiClient::parse_json(response).await
}

pub async fn get_visit(client: &ApiClient, id: &str) -> Result<Visit, PersistenceError> {
    let path = format!("/visits/{id}/");
    let response = client.execute(Method::GET, &path, &[], None).await?;
    ApiClient::parse_json(response).await
}

/// `POST /visits`: create a booking.
pub async fn create_visit(
    client: &ApiClient,
    draft: &VisitDraft,
) -> Result<Visit, PersistenceError> {
    let body = RequestBody::Json(
        serde_json::to_value(draft).map_err(|e| PersistenceError::Http(e.to_string()))?,
    );
    let response = client
        .execute(Method::POST, "/visits/", &[], Some(body))
        .await?;
    ApiClient::parse_json(response).await
}

/// `PATCH /visits/{id}`: consultation completion or privileged re-edit.
pub async fn update_visit(
    client: &ApiClient,
    visit_id: &str,
    update: &VisitUpdate,
) -> Result<Visit, PersistenceError> {
    let path = format!("/visits/{visit_id}/");
    let body = RequestBody::Json(
        serde_json::to_value(update).map_err(|e| PersistenceError::Http(e.to_string()))?,
    );
    let response = client
        .execute(Method::PATCH, &path, &[], Some(body))
        .await?;
    ApiClient::parse_json(response).await
}

/// `POST /visits/{id}/upload_attachment`: multipart, single file field.
pub async fn upload_attachment(
    client: &ApiClient,
    visit_id: &str,
    file: &AttachmentUpload,
) -> Result<(), PersistenceError> {
    let path = format!("/visits/{visit_id}/upload_attachment/");
    let body = RequestBody::Multipart {
        fields: vec![],
        files: vec![("file".to_string(), file.clone())],
    };
    client.execute(Method::POST, &path, &[], Some(body)).await?;
    Ok(())
}

/// `POST /visits/{id}/add_payment`: append a ledger entry; the response
/// is the authoritative bill.
pub async fn add_payment(
    client: &ApiClient,
    visit_id: &str,
    request: &PaymentRequest,
) -> Result<Bill, PersistenceError> {
    let path = format!("/visits/{visit_id}/add_payment/");
    let body = RequestBody::Json(
        serde_json::to_value(request).map_err(|e| PersistenceError::Http(e.to_string()))?,
    );
    let response = client.execute(Method::POST, &path, &[], Some(body)).await?;
    ApiClient::parse_json(response).await
}
