//! SurrealDB implementation of [`ApplicationRepository`].
//!
//! `service_name`, `user_name`, and `fees` are written once at create
//! time and never touched by any update here — the snapshot invariant
//! lives in this file as much as in the caller.

use chrono::{DateTime, Utc};
use egram_core::error::PortalResult;
use egram_core::models::application::{
    Application, ApplicationStatus, CreateApplication, StatusChange,
};
use egram_core::repository::{ApplicationRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ApplicationRow {
    service_id: String,
    service_name: String,
    user_id: String,
    user_name: String,
    fees: u32,
    status: String,
    documents: Vec<String>,
    updated_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ApplicationRowWithId {
    record_id: String,
    service_id: String,
    service_name: String,
    user_id: String,
    user_name: String,
    fees: u32,
    status: String,
    documents: Vec<String>,
    updated_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<ApplicationStatus, DbError> {
    ApplicationStatus::parse(s)
        .map_err(|_| DbError::Migration(format!("unknown application status: {s}")))
}

impl ApplicationRow {
    fn into_application(self, id: Uuid) -> Result<Application, DbError> {
        let service_id = Uuid::parse_str(&self.service_id)
            .map_err(|e| DbError::Migration(format!("invalid service UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))?;
        let updated_by = self
            .updated_by
            .map(|s| {
                Uuid::parse_str(&s)
                    .map_err(|e| DbError::Migration(format!("invalid reviewer UUID: {e}")))
            })
            .transpose()?;
        Ok(Application {
            id,
            service_id,
            service_name: self.service_name,
            user_id,
            user_name: self.user_name,
            fees: self.fees,
            status: parse_status(&self.status)?,
            documents: self.documents,
            updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ApplicationRowWithId {
    fn try_into_application(self) -> Result<Application, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let row = ApplicationRow {
            service_id: self.service_id,
            service_name: self.service_name,
            user_id: self.user_id,
            user_name: self.user_name,
            fees: self.fees,
            status: self.status,
            documents: self.documents,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        row.into_application(id)
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Application repository.
#[derive(Clone)]
pub struct SurrealApplicationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealApplicationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ApplicationRepository for SurrealApplicationRepository<C> {
    async fn create(&self, input: CreateApplication) -> PortalResult<Application> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('application', $id) SET \
                 service_id = $service_id, \
                 service_name = $service_name, \
                 user_id = $user_id, \
                 user_name = $user_name, \
                 fees = $fees, \
                 status = 'pending', \
                 documents = [], \
                 updated_by = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("service_id", input.service_id.to_string()))
            .bind(("service_name", input.service_name))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("user_name", input.user_name))
            .bind(("fees", input.fees))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ApplicationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "application".into(),
            id: id_str,
        })?;

        Ok(row.into_application(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> PortalResult<Application> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('application', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApplicationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "application".into(),
            id: id_str,
        })?;

        Ok(row.into_application(id)?)
    }

    async fn set_status(&self, id: Uuid, change: StatusChange) -> PortalResult<Application> {
        let id_str = id.to_string();

        // Unconditional write: no prior-status check, no version check.
        let result = self
            .db
            .query(
                "UPDATE type::record('application', $id) SET \
                 status = $status, \
                 updated_by = $updated_by, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", change.status.as_str().to_string()))
            .bind(("updated_by", change.updated_by.map(|u| u.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ApplicationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "application".into(),
            id: id_str,
        })?;

        Ok(row.into_application(id)?)
    }

    async fn list(&self, pagination: Pagination) -> PortalResult<PaginatedResult<Application>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM application GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM application \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApplicationRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_application())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> PortalResult<PaginatedResult<Application>> {
        let user_id_str = user_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM application \
                 WHERE user_id = $user_id GROUP ALL",
            )
            .bind(("user_id", user_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM application \
                 WHERE user_id = $user_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("user_id", user_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApplicationRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_application())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
