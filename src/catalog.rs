//! Treatment catalog management.
//!
//! Mutations are gated in the core: doctor and admin may change the
//! catalog, reception may only read it. Price changes never reprice
//! treatments already prescribed on a visit; those carry their own
//! snapshots.

use crate::api::CatalogBackend;
use crate::error::{ValidationError, WorkflowError};
use crate::lifecycle::{self, StaffAction};
use crate::models::{NewTreatment, Role, Treatment, TreatmentUpdate};
use crate::notify::Notifier;

/// Add a catalog entry.
pub async fn add_treatment<B: CatalogBackend>(
    backend: &B,
    role: Role,
    new: &NewTreatment,
    notifier: &Notifier,
) -> Result<Treatment, WorkflowError> {
    lifecycle::ensure_permitted(role, StaffAction::ManageCatalog)?;
    if new.title.trim().is_empty() {
        return Err(ValidationError::MissingField("title").into());
    }

    let treatment = match backend.create_treatment(new).await {
        Ok(treatment) => treatment,
        Err(err) => {
            notifier.error("Failed to add treatment");
            return Err(err.into());
        }
    };

    tracing::info!(treatment_id = %treatment.id, title = %treatment.title, "treatment added");
    notifier.success(format!("Treatment {} added", treatment.title));
    Ok(treatment)
}

/// Edit a catalog entry. Existing visit lines keep their price snapshots.
pub async fn edit_treatment<B: CatalogBackend>(
    backend: &B,
    role: Role,
    id: &str,
    update: &TreatmentUpdate,
    notifier: &Notifier,
) -> Result<Treatment, WorkflowError> {
    lifecycle::ensure_permitted(role, StaffAction::ManageCatalog)?;

    let treatment = match backend.update_treatment(id, update).await {
        Ok(treatment) => treatment,
        Err(err) => {
            notifier.error("Failed to update treatment");
            return Err(err.into());
        }
    };

    notifier.success(format!("Treatment {} updated", treatment.title));
    Ok(treatment)
}

/// Remove a catalog entry.
pub async fn remove_treatment<B: CatalogBackend>(
    backend: &B,
    role: Role,
    id: &str,
    notifier: &Notifier,
) -> Result<(), WorkflowError> {
    lifecycle::ensure_permitted(role, StaffAction::ManageCatalog)?;

    if let Err(err) = backend.delete_treatment(id).await {
        notifier.error("Failed to delete treatment");
        return Err(err.into());
    }

    tracing::info!(treatment_id = %id, "treatment removed");
    notifier.success("Treatment deleted");
    Ok(())
}
