//! Catalog service domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A government service citizens can apply for.
///
/// Edits overwrite in place — there is no versioning. Applications
/// snapshot the fields they need at apply time, so later edits never
/// reach existing applications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub department: String,
    /// Fees in whole rupees.
    pub fees: u32,
    pub processing_time_days: u32,
    pub validity_days: u32,
    pub document_required: String,
    pub eligibility: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateService {
    pub title: String,
    pub description: String,
    pub department: String,
    pub fees: u32,
    pub processing_time_days: u32,
    pub validity_days: u32,
    pub document_required: String,
    pub eligibility: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateService {
    pub title: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,
    pub fees: Option<u32>,
    pub processing_time_days: Option<u32>,
    pub validity_days: Option<u32>,
    pub document_required: Option<String>,
    pub eligibility: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    /// `Some(Some(date))` = set, `Some(None)` = clear, `None` = no change.
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub is_active: Option<bool>,
}
