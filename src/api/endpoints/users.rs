//! `/users`: staff account CRUD. Admin-only on the backend; mutations are
//! reached through the gated entry points in `staff`.

use reqwest::Method;

use crate::api::error::PersistenceError;
use crate::api::types::RequestBody;
use crate::api::ApiClient;
use crate::models::{NewUser, User, UserUpdate};

pub async fn list_users(client: &ApiClient) -> Result<Vec<User>, PersistenceError> {
    let response = client.execute(Method::GET, "/users/", &[], None).await?;
    ApiClient::parse_json(response).await
}

pub async fn create_user(client: &ApiClient, new: &NewUser) -> Result<User, PersistenceError> {
    let body = RequestBody::Json(
        serde_json::to_value(new).map_err(|e| PersistenceError::Http(e.to_string()))?,
    );
    let response = client
        .execute(Method::POST, "/users/", &[], Some(body))
        .await?;
    ApiClient::parse_json(response).await
}

pub async fn update_user(
    client: &ApiClient,
    id: &str,
    update: &UserUpdate,
) -> Result<User, PersistenceError> {
    let path = format!("/users/{id}/");
    let body = RequestBody::Json(
        serde_json::to_value(update).map_err(|e| PersistenceError::Http(e.to_string()))?,
    );
    let response = client
        .execute(Method::PATCH, &path, &[], Some(body))
        .await?;
    ApiClient::parse_json(response).await
}

pub async fn delete_user(client: &ApiClient, id: &str) -> Result<(), PersistenceError> {
    let path = format!("/users/{id}/");
    client.execute(Method::DELETE, &path, &[], None).await?;
    Ok(())
}
