//! `POST /auth/login`: bearer-token session establishment.

use std::str::FromStr;

use reqwest::Method;
use serde_json::json;

use crate::api::error::PersistenceError;
use crate::api::types::{LoginResponse, RequestBody};
use crate::api::ApiClient;
use crate::models::{Role, User};
use crate::session::Session;

/// Log in with staff credentials. On success the session is installed on
/// the client, so every subsequent call carries the bearer token.
pub async fn login(
    client: &ApiClient,
    email: &str,
    password: &str,
) -> Result<Session, PersistenceError> {
    let body = RequestBody::Json(json!({
        "email": email,
        "password": password,
    }));

    let response = client
        .execute(Method::POST, "/auth/login/", &[], Some(body))
        .await?;
    let login: LoginResponse = ApiClient::parse_json(response).await?;

    let role = Role::from_str(&login.role)
        .map_err(|_| PersistenceError::ResponseParsing(format!("unknown role {}", login.role)))?;

    let session = Session {
        access_token: login.access,
        refresh_token: login.refresh,
        user: User {
            // The backend serializes the pk as a number; normalize to a string id.
            id: match login.id {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            },
            name: login.name,
            email: login.email,
            role,
            avatar: login.avatar,
        },
    };

    tracing::info!(user = %session.user.name, role = %session.user.role, "logged in");
    client.set_session(session.clone());
    Ok(session)
}

/// Drop the installed session.
pub fn logout(client: &ApiClient) {
    client.clear_session();
    tracing::info!("logged out");
}
