use serde::{Deserialize, Serialize};

/// A treatment catalog entry. `price` is the current per-sitting price;
/// prescribed visits carry their own snapshot and are unaffected when this
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treatment {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    /// Current price per sitting, whole rupees.
    #[serde(default)]
    pub price: i64,
}

/// Payload for adding a catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct NewTreatment {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub price: i64,
}

/// Partial update for a catalog entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TreatmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
}
