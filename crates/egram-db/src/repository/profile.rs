//! SurrealDB implementation of [`ProfileRepository`].
//!
//! Profile records are keyed by the owning auth identity, so `create`
//! takes the identity id instead of minting a fresh one.

use chrono::{DateTime, Utc};
use egram_core::error::PortalResult;
use egram_core::models::profile::{CreateProfile, Role, UpdateProfile, UserProfile};
use egram_core::repository::{PaginatedResult, Pagination, ProfileRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ProfileRow {
    full_name: String,
    email: String,
    phone: String,
    address: String,
    photo_url: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ProfileRowWithId {
    record_id: String,
    full_name: String,
    email: String,
    phone: String,
    address: String,
    photo_url: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parse a stored role string into the closed role set.
///
/// Corrupt documents surface as a typed error rather than being
/// silently skipped.
fn parse_role(s: &str) -> Result<Role, DbError> {
    Role::parse(s).map_err(|_| DbError::InvalidRole {
        value: s.to_string(),
    })
}

impl ProfileRow {
    fn into_profile(self, id: Uuid) -> Result<UserProfile, DbError> {
        Ok(UserProfile {
            id,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            photo_url: self.photo_url,
            role: parse_role(&self.role)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ProfileRowWithId {
    fn try_into_profile(self) -> Result<UserProfile, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(UserProfile {
            id,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            photo_url: self.photo_url,
            role: parse_role(&self.role)?,
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

/// SurrealDB implementation of the Profile repository.
#[derive(Clone)]
pub struct SurrealProfileRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProfileRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProfileRepository for SurrealProfileRepository<C> {
    async fn create(&self, input: CreateProfile) -> PortalResult<UserProfile> {
        let id = input.identity_id;
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('profile', $id) SET \
                 full_name = $full_name, \
                 email = $email, \
                 phone = $phone, \
                 address = $address, \
                 photo_url = $photo_url, \
                 role = $role",
            )
            .bind(("id", id_str.clone()))
            .bind(("full_name", input.full_name))
            .bind(("email", input.email))
            .bind(("phone", input.phone))
            .bind(("address", input.address))
            .bind(("photo_url", input.photo_url))
            .bind(("role", input.role.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "profile".into(),
            id: id_str,
        })?;

        Ok(row.into_profile(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> PortalResult<UserProfile> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('profile', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "profile".into(),
            id: id_str,
        })?;

        Ok(row.into_profile(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateProfile) -> PortalResult<UserProfile> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.full_name.is_some() {
            sets.push("full_name = $full_name");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.address.is_some() {
            sets.push("address = $address");
        }
        if input.photo_url.is_some() {
            sets.push("photo_url = $photo_url");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('profile', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(full_name) = input.full_name {
            builder = builder.bind(("full_name", full_name));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(address) = input.address {
            builder = builder.bind(("address", address));
        }
        if let Some(photo_url) = input.photo_url {
            // photo_url is Option<Option<String>>: Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("photo_url", photo_url));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "profile".into(),
            id: id_str,
        })?;

        Ok(row.into_profile(id)?)
    }

    async fn list(&self, pagination: Pagination) -> PortalResult<PaginatedResult<UserProfile>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM profile GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM profile \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_profile())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_by_role(
        &self,
        role: Role,
        pagination: Pagination,
    ) -> PortalResult<PaginatedResult<UserProfile>> {
        let role_str = role.as_str().to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM profile \
                 WHERE role = $role GROUP ALL",
            )
            .bind(("role", role_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM profile \
                 WHERE role = $role \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("role", role_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_profile())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
