//! User profile domain model and the closed role set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PortalError;

/// The closed set of portal roles. Exactly one role per profile.
///
/// Stored as the lowercase strings `admin`, `staff`, `user`. Any other
/// value is rejected at the parse boundary with
/// [`PortalError::InvalidRole`] — there is no fallback branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::User => "user",
        }
    }

    pub fn parse(value: &str) -> Result<Self, PortalError> {
        match value {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            "user" => Ok(Role::User),
            other => Err(PortalError::InvalidRole {
                value: other.to_string(),
            }),
        }
    }

    /// May create, edit, and delete catalog services.
    pub fn manages_catalog(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// May move applications between review statuses.
    pub fn reviews_applications(&self) -> bool {
        matches!(self, Role::Admin | Role::Staff)
    }
}

/// The store record describing a person, keyed by their auth identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Same value as the owning auth identity. This is the sole
    /// cross-reference key between the two collections; consistency is
    /// advisory only.
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub photo_url: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfile {
    pub identity_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub photo_url: Option<String>,
    pub role: Role,
}

/// Contact-detail updates. A role field is deliberately absent: a
/// profile's role is fixed at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// `Some(Some(url))` = set, `Some(None)` = clear, `None` = no change.
    pub photo_url: Option<Option<String>>,
}
