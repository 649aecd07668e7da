//! Application domain model and its review status set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PortalError;

/// Review status of an application.
///
/// The transition table is fully permissive: reviewers may write any
/// status from any prior status, including moving an approved or
/// rejected application back to pending. This is a documented semantic
/// of the portal, not an oversight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Result<Self, PortalError> {
        match value {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(PortalError::Internal(format!(
                "unknown application status: {other}"
            ))),
        }
    }
}

/// A citizen's application to a service.
///
/// `service_name`, `user_name`, and `fees` are copies taken at apply
/// time. They are immutable-at-creation fields, not derived joins:
/// editing the source service or profile never changes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub service_id: Uuid,
    pub service_name: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub fees: u32,
    pub status: ApplicationStatus,
    pub documents: Vec<String>,
    /// Reviewer that last changed the status. Stamped for staff
    /// reviewers, cleared for admin reviewers.
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApplication {
    pub service_id: Uuid,
    pub service_name: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub fees: u32,
}

/// A status write. No prior-status precondition and no version check:
/// concurrent writers overwrite each other, last write wins.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub status: ApplicationStatus,
    pub updated_by: Option<Uuid>,
}
