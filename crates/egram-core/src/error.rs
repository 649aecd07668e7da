//! Error types for the portal core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Unknown role value: {value}")]
    InvalidRole { value: String },

    #[error("No profile document for identity {identity}")]
    ProfileMissing { identity: String },

    #[error(
        "Admin session not restored: {restore} (staff provisioning: {})",
        .provision.as_deref().unwrap_or("succeeded")
    )]
    AdminLockout {
        /// Error from the provisioning steps, if any failed.
        provision: Option<String>,
        /// Error from the re-authentication attempt.
        restore: String,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type PortalResult<T> = Result<T, PortalError>;
