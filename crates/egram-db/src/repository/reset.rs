//! SurrealDB implementation of [`PasswordResetRepository`].

use chrono::{DateTime, Utc};
use egram_core::error::PortalResult;
use egram_core::models::reset::{CreatePasswordReset, PasswordReset};
use egram_core::repository::PasswordResetRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ResetRow {
    identity_id: String,
    token_hash: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ResetRowWithId {
    record_id: String,
    identity_id: String,
    token_hash: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

fn row_to_reset(row: ResetRow, id: Uuid) -> Result<PasswordReset, DbError> {
    let identity_id = Uuid::parse_str(&row.identity_id)
        .map_err(|e| DbError::Migration(format!("invalid identity UUID: {e}")))?;
    Ok(PasswordReset {
        id,
        identity_id,
        token_hash: row.token_hash,
        expires_at: row.expires_at,
        created_at: row.created_at,
    })
}

impl ResetRowWithId {
    fn try_into_reset(self) -> Result<PasswordReset, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let identity_id = Uuid::parse_str(&self.identity_id)
            .map_err(|e| DbError::Migration(format!("invalid identity UUID: {e}")))?;
        Ok(PasswordReset {
            id,
            identity_id,
            token_hash: self.token_hash,
            expires_at: self.expires_at,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the PasswordReset repository.
#[derive(Clone)]
pub struct SurrealPasswordResetRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPasswordResetRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PasswordResetRepository for SurrealPasswordResetRepository<C> {
    async fn create(&self, input: CreatePasswordReset) -> PortalResult<PasswordReset> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('password_reset', $id) SET \
                 identity_id = $identity_id, \
                 token_hash = $token_hash, \
                 expires_at = $expires_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("identity_id", input.identity_id.to_string()))
            .bind(("token_hash", input.token_hash))
            .bind(("expires_at", input.expires_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ResetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "password_reset".into(),
            id: id_str,
        })?;

        row_to_reset(row, id).map_err(Into::into)
    }

    async fn get_by_token_hash(&self, token_hash: &str) -> PortalResult<PasswordReset> {
        let token_hash_owned = token_hash.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM password_reset \
                 WHERE token_hash = $token_hash",
            )
            .bind(("token_hash", token_hash_owned.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResetRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "password_reset".into(),
            id: format!("token_hash={token_hash_owned}"),
        })?;

        row.try_into_reset().map_err(Into::into)
    }

    async fn consume(&self, id: Uuid) -> PortalResult<()> {
        self.db
            .query("DELETE type::record('password_reset', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
