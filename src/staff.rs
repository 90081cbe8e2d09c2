//! Staff account management, admin only.
//!
//! The backend enforces the role check on its side too; the core refuses
//! to issue the request at all for non-admin sessions.

use crate::api::StaffDirectory;
use crate::error::{ValidationError, WorkflowError};
use crate::lifecycle::{self, StaffAction};
use crate::models::{NewUser, Role, User, UserUpdate};
use crate::notify::Notifier;

/// Create a staff account.
pub async fn add_staff_account<B: StaffDirectory>(
    backend: &B,
    role: Role,
    new: &NewUser,
    notifier: &Notifier,
) -> Result<User, WorkflowError> {
    lifecycle::ensure_permitted(role, StaffAction::ManageUsers)?;
    if new.name.trim().is_empty() {
        return Err(ValidationError::MissingField("name").into());
    }
    if new.email.trim().is_empty() {
        return Err(ValidationError::MissingField("email").into());
    }
    if new.password.is_empty() {
        return Err(ValidationError::MissingField("password").into());
    }

    let user = match backend.create_user(new).await {
        Ok(user) => user,
        Err(err) => {
            notifier.error("Failed to create staff account");
            return Err(err.into());
        }
    };

    tracing::info!(user_id = %user.id, role = %user.role, "staff account created");
    notifier.success(format!("Account for {} created", user.name));
    Ok(user)
}

/// Update a staff account (role change, profile edit).
pub async fn update_staff_account<B: StaffDirectory>(
    backend: &B,
    role: Role,
    id: &str,
    update: &UserUpdate,
    notifier: &Notifier,
) -> Result<User, WorkflowError> {
    lifecycle::ensure_permitted(role, StaffAction::ManageUsers)?;

    let user = match backend.update_user(id, update).await {
        Ok(user) => user,
        Err(err) => {
            notifier.error("Failed to update staff account");
            return Err(err.into());
        }
    };

    notifier.success(format!("Account for {} updated", user.name));
    Ok(user)
}

/// Remove a staff account.
pub async fn remove_staff_account<B: StaffDirectory>(
    backend: &B,
    role: Role,
    id: &str,
    notifier: &Notifier,
) -> Result<(), WorkflowError> {
    lifecycle::ensure_permitted(role, StaffAction::ManageUsers)?;

    if let Err(err) = backend.delete_user(id).await {
        notifier.error("Failed to delete staff account");
        return Err(err.into());
    }

    tracing::info!(user_id = %id, "staff account removed");
    notifier.success("Account deleted");
    Ok(())
}
