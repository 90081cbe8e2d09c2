//! Wire helpers shared by the endpoint modules.

use serde::Deserialize;

use crate::models::AttachmentUpload;

/// Body of an outgoing request, decided once by the endpoint that builds
/// it. A create call is JSON or multipart depending on whether a file is
/// attached; the choice is an explicit tagged variant resolved at the
/// boundary instead of being re-derived downstream.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(serde_json::Value),
    Multipart {
        fields: Vec<(String, String)>,
        files: Vec<(String, AttachmentUpload)>,
    },
}

impl RequestBody {
    /// Build the reqwest form for the multipart variant.
    pub(crate) fn into_multipart_form(
        fields: Vec<(String, String)>,
        files: Vec<(String, AttachmentUpload)>,
    ) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in fields {
            form = form.text(name, value);
        }
        for (name, file) in files {
            let AttachmentUpload {
                file_name,
                content_type,
                bytes,
            } = file;
            let part = reqwest::multipart::Part::bytes(bytes.clone()).file_name(file_name.clone());
            let part = match content_type {
                Some(mime) => part.mime_str(&mime).unwrap_or_else(|_| {
                    // Unparseable MIME from the caller; send without one.
                    reqwest::multipart::Part::bytes(bytes).file_name(file_name)
                }),
                None => part,
            };
            form = form.part(name, part);
        }
        form
    }
}

/// `POST /auth/login` response: token pair plus the logged-in user inline.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub id: serde_json::Value,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Conflict body returned with HTTP 409 on duplicate registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictBody {
    #[serde(default)]
    pub existing_patient_id: Option<String>,
}
