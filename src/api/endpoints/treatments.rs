//! `/treatments`: catalog CRUD. Mutations are reached through the gated
//! entry points in `catalog`, never called directly by hosts.

use reqwest::Method;

use crate::api::error::PersistenceError;
use crate::api::types::RequestBody;
use crate::api::ApiClient;
use crate::models::{NewTreatment, Treatment, TreatmentUpdate};

pub async fn list_treatments(client: &ApiClient) -> Result<Vec<Treatment>, PersistenceError> {
    let response = client.execute(Method::GET, "/treatments/", &[], None).await?;
    ApiClient::parse_json(response).await
}

pub async fn create_treatment(
    client: &ApiClient,
    new: &NewTreatment,
) -> Result<Treatment, PersistenceError> {
    let body = RequestBody::Json(
        serde_json::to_value(new).map_err(|e| PersistenceError::Http(e.to_string()))?,
    );
    let response = client
        .execute(Method::POST, "/treatments/", &[], Some(body))
        .await?;
    ApiClient::parse_json(response).await
}

pub async fn update_treatment(
    client: &ApiClient,
    id: &str,
    update: &TreatmentUpdate,
) -> Result<Treatment, PersistenceError> {
    let path = format!("/treatments/{id}/");
    let body = RequestBody::Json(
        serde_json::to_value(update).map_err(|e| PersistenceError::Http(e.to_string()))?,
    );
    let response = client
        .execute(Method::PATCH, &path, &[], Some(body))
        .await?;
    ApiClient::parse_json(response).await
}

pub async fn delete_treatment(client: &ApiClient, id: &str) -> Result<(), PersistenceError> {
    let path = format!("/treatments/{id}/");
    client.execute(Method::DELETE, &path, &[], None).await?;
    Ok(())
}
