//! SurrealDB implementation of [`ServiceRepository`].

use chrono::{DateTime, Utc};
use egram_core::error::PortalResult;
use egram_core::models::service::{CreateService, Service, UpdateService};
use egram_core::repository::{PaginatedResult, Pagination, ServiceRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ServiceRow {
    title: String,
    description: String,
    department: String,
    fees: u32,
    processing_time_days: u32,
    validity_days: u32,
    document_required: String,
    eligibility: String,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ServiceRowWithId {
    record_id: String,
    title: String,
    description: String,
    department: String,
    fees: u32,
    processing_time_days: u32,
    validity_days: u32,
    document_required: String,
    eligibility: String,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ServiceRow {
    fn into_service(self, id: Uuid) -> Service {
        Service {
            id,
            title: self.title,
            description: self.description,
            department: self.department,
            fees: self.fees,
            processing_time_days: self.processing_time_days,
            validity_days: self.validity_days,
            document_required: self.document_required,
            eligibility: self.eligibility,
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ServiceRowWithId {
    fn try_into_service(self) -> Result<Service, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Service {
            id,
            title: self.title,
            description: self.description,
            department: self.department,
            fees: self.fees,
            processing_time_days: self.processing_time_days,
            validity_days: self.validity_days,
            document_required: self.document_required,
            eligibility: self.eligibility,
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Service repository.
#[derive(Clone)]
pub struct SurrealServiceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealServiceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ServiceRepository for SurrealServiceRepository<C> {
    async fn create(&self, input: CreateService) -> PortalResult<Service> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('service', $id) SET \
                 title = $title, \
                 description = $description, \
                 department = $department, \
                 fees = $fees, \
                 processing_time_days = $processing_time_days, \
                 validity_days = $validity_days, \
                 document_required = $document_required, \
                 eligibility = $eligibility, \
                 start_date = $start_date, \
                 end_date = $end_date, \
                 is_active = $is_active",
            )
            .bind(("id", id_str.clone()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("department", input.department))
            .bind(("fees", input.fees))
            .bind(("processing_time_days", input.processing_time_days))
            .bind(("validity_days", input.validity_days))
            .bind(("document_required", input.document_required))
            .bind(("eligibility", input.eligibility))
            .bind(("start_date", input.start_date))
            .bind(("end_date", input.end_date))
            .bind(("is_active", input.is_active))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ServiceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "service".into(),
            id: id_str,
        })?;

        Ok(row.into_service(id))
    }

    async fn get_by_id(&self, id: Uuid) -> PortalResult<Service> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('service', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ServiceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "service".into(),
            id: id_str,
        })?;

        Ok(row.into_service(id))
    }

    async fn update(&self, id: Uuid, input: UpdateService) -> PortalResult<Service> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.department.is_some() {
            sets.push("department = $department");
        }
        if input.fees.is_some() {
            sets.push("fees = $fees");
        }
        if input.processing_time_days.is_some() {
            sets.push("processing_time_days = $processing_time_days");
        }
        if input.validity_days.is_some() {
            sets.push("validity_days = $validity_days");
        }
        if input.document_required.is_some() {
            sets.push("document_required = $document_required");
        }
        if input.eligibility.is_some() {
            sets.push("eligibility = $eligibility");
        }
        if input.start_date.is_some() {
            sets.push("start_date = $start_date");
        }
        if input.end_date.is_some() {
            sets.push("end_date = $end_date");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('service', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(department) = input.department {
            builder = builder.bind(("department", department));
        }
        if let Some(fees) = input.fees {
            builder = builder.bind(("fees", fees));
        }
        if let Some(processing_time_days) = input.processing_time_days {
            builder = builder.bind(("processing_time_days", processing_time_days));
        }
        if let Some(validity_days) = input.validity_days {
            builder = builder.bind(("validity_days", validity_days));
        }
        if let Some(document_required) = input.document_required {
            builder = builder.bind(("document_required", document_required));
        }
        if let Some(eligibility) = input.eligibility {
            builder = builder.bind(("eligibility", eligibility));
        }
        if let Some(start_date) = input.start_date {
            builder = builder.bind(("start_date", start_date));
        }
        if let Some(end_date) = input.end_date {
            // end_date is Option<Option<DateTime>>: Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("end_date", end_date));
        }
        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ServiceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "service".into(),
            id: id_str,
        })?;

        Ok(row.into_service(id))
    }

    async fn delete(&self, id: Uuid) -> PortalResult<()> {
        // Hard delete; existing applications keep their snapshot fields.
        self.db
            .query("DELETE type::record('service', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> PortalResult<PaginatedResult<Service>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM service GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM service \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ServiceRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_service())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
