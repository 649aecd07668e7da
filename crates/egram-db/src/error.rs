//! Database-specific error types and conversions.

use egram_core::error::PortalError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Stored role is not in the closed role set: {value}")]
    InvalidRole { value: String },
}

impl From<DbError> for PortalError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => PortalError::NotFound { entity, id },
            DbError::AlreadyExists { entity } => PortalError::AlreadyExists { entity },
            DbError::InvalidRole { value } => PortalError::InvalidRole { value },
            other => PortalError::Database(other.to_string()),
        }
    }
}
