//! REST boundary to the clinic backend.
//!
//! `ApiClient` is the only place requests are built: it owns the base URL,
//! attaches the bearer token from the threaded-through session, and
//! resolves the JSON-vs-multipart decision once per call. Endpoint modules
//! group the typed calls per resource.
//!
//! The workflows depend on the narrow [`ClinicBackend`] trait rather than
//! on `ApiClient` directly, so tests can drive them against an in-memory
//! fake.

pub mod endpoints;
pub mod error;
#[cfg(test)]
pub(crate) mod fake;
pub mod types;

use std::sync::RwLock;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::config;
use crate::models::{
    AttachmentUpload, Bill, NewPatient, NewTreatment, NewUser, Patient, Treatment,
    TreatmentUpdate, User, UserUpdate, Visit, VisitDraft, VisitUpdate,
};
use crate::payments::PaymentRequest;
use crate::session::Session;

use error::{PersistenceError, RegistrationError};
use types::RequestBody;

/// Request timeout for all backend calls.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Typed client for the clinic REST backend.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: RwLock<Option<Session>>,
}

impl ApiClient {
    /// Client against an explicit base URL (no trailing slash).
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            session: RwLock::new(None),
        }
    }

    /// Client against the configured backend.
    pub fn from_config() -> Self {
        Self::new(&config::api_base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Session ──────────────────────────────────────────

    /// Install the authenticated session whose bearer token is attached to
    /// every subsequent request.
    pub fn set_session(&self, session: Session) {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = Some(session);
    }

    pub fn clear_session(&self) {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Snapshot of the current session, if logged in.
    pub fn session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    // ── Request plumbing ─────────────────────────────────

    /// Build, send and return the raw response without status mapping.
    /// Endpoints that need to inspect specific statuses (e.g. 409 on
    /// duplicate registration) use this directly.
    pub(crate) async fn execute_raw(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<RequestBody>,
    ) -> Result<reqwest::Response, PersistenceError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.access_token() {
            request = request.bearer_auth(token);
        }

        // The body variant was decided by the endpoint; resolve it here.
        request = match body {
            Some(RequestBody::Json(value)) => request.json(&value),
            Some(RequestBody::Multipart { fields, files }) => {
                request.multipart(RequestBody::into_multipart_form(fields, files))
            }
            None => request,
        };

        tracing::debug!(%method, %url, "dispatching backend request");
        request
            .send()
            .await
            .map_err(|e| PersistenceError::from_reqwest(e, &self.base_url))
    }

    /// As [`execute_raw`](Self::execute_raw), with uniform status mapping.
    pub(crate) async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<RequestBody>,
    ) -> Result<reqwest::Response, PersistenceError> {
        let response = self.execute_raw(method, path, query, body).await?;
        Self::check_status(response, path).await
    }

    pub(crate) async fn check_status(
        response: reqwest::Response,
        path: &str,
    ) -> Result<reqwest::Response, PersistenceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(PersistenceError::Unauthorized);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PersistenceError::NotFound(path.to_string()));
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%path, status = status.as_u16(), "backend rejected request");
        Err(PersistenceError::Server {
            status: status.as_u16(),
            body,
        })
    }

    /// Decode a JSON response body.
    pub(crate) async fn parse_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PersistenceError> {
        response
            .json::<T>()
            .await
            .map_err(|e| PersistenceError::ResponseParsing(e.to_string()))
    }
}

/// The slice of the backend the clinical workflows need. `ApiClient` is
/// the production implementation; tests use an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait ClinicBackend {
    async fn register_patient(&self, new: &NewPatient) -> Result<Patient, RegistrationError>;

    async fn create_visit(&self, draft: &VisitDraft) -> Result<Visit, PersistenceError>;

    async fn update_visit(
        &self,
        visit_id: &str,
        update: &VisitUpdate,
    ) -> Result<Visit, PersistenceError>;

    async fn upload_attachment(
        &self,
        visit_id: &str,
        file: &AttachmentUpload,
    ) -> Result<(), PersistenceError>;

    async fn add_payment(
        &self,
        visit_id: &str,
        request: &PaymentRequest,
    ) -> Result<Bill, PersistenceError>;
}

/// Treatment catalog mutations. Split from [`ClinicBackend`] because the
/// catalog workflow is gated differently (doctor/admin only).
#[allow(async_fn_in_trait)]
pub trait CatalogBackend {
    async fn create_treatment(&self, new: &NewTreatment) -> Result<Treatment, PersistenceError>;

    async fn update_treatment(
        &self,
        id: &str,
        update: &TreatmentUpdate,
    ) -> Result<Treatment, PersistenceError>;

    async fn delete_treatment(&self, id: &str) -> Result<(), PersistenceError>;
}

/// Staff account mutations, admin only.
#[allow(async_fn_in_trait)]
pub trait StaffDirectory {
    async fn create_user(&self, new: &NewUser) -> Result<User, PersistenceError>;

    async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<User, PersistenceError>;

    async fn delete_user(&self, id: &str) -> Result<(), PersistenceError>;
}

impl ClinicBackend for ApiClient {
    async fn register_patient(&self, new: &NewPatient) -> Result<Patient, RegistrationError> {
        endpoints::patients::create_patient(self, new).await
    }

    async fn create_visit(&self, draft: &VisitDraft) -> Result<Visit, PersistenceError> {
        endpoints::visits::create_visit(self, draft).await
    }

    async fn update_visit(
        &self,
        visit_id: &str,
        update: &VisitUpdate,
    ) -> Result<Visit, PersistenceError> {
        endpoints::visits::update_visit(self, visit_id, update).await
    }

    async fn upload_attachment(
        &self,
        visit_id: &str,
        file: &AttachmentUpload,
    ) -> Result<(), PersistenceError> {
        endpoints::visits::upload_attachment(self, visit_id, file).await
    }

    async fn add_payment(
        &self,
        visit_id: &str,
        request: &PaymentRequest,
    ) -> Result<Bill, PersistenceError> {
        endpoints::visits::add_payment(self, visit_id, request).await
    }
}

impl CatalogBackend for ApiClient {
    async fn create_treatment(&self, new: &NewTreatment) -> Result<Treatment, PersistenceError> {
        endpoints::treatments::create_treatment(self, new).await
    }

    async fn update_treatment(
        &self,
        id: &str,
        update: &TreatmentUpdate,
    ) -> Result<Treatment, PersistenceError> {
        endpoints::treatments::update_treatment(self, id, update).await
    }

    async fn delete_treatment(&self, id: &str) -> Result<(), PersistenceError> {
        endpoints::treatments::delete_treatment(self, id).await
    }
}

impl StaffDirectory for ApiClient {
    async fn create_user(&self, new: &NewUser) -> Result<User, PersistenceError> {
        endpoints::users::create_user(self, new).await
    }

    async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<User, PersistenceError> {
        endpoints::users::update_user(self, id, update).await
    }

    async fn delete_user(&self, id: &str) -> Result<(), PersistenceError> {
        endpoints::users::delete_user(self, id).await
    }
}
