//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Closed string sets (role, application
//! status) carry ASSERT constraints so the store rejects values outside
//! the set.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Identities (auth provider credentials)
-- =======================================================================
DEFINE TABLE identity SCHEMAFULL;
DEFINE FIELD email ON TABLE identity TYPE string;
DEFINE FIELD password_hash ON TABLE identity TYPE string;
DEFINE FIELD created_at ON TABLE identity TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_identity_email ON TABLE identity \
    COLUMNS email UNIQUE;

-- =======================================================================
-- Profiles (keyed by identity)
-- =======================================================================
DEFINE TABLE profile SCHEMAFULL;
DEFINE FIELD full_name ON TABLE profile TYPE string;
DEFINE FIELD email ON TABLE profile TYPE string;
DEFINE FIELD phone ON TABLE profile TYPE string;
DEFINE FIELD address ON TABLE profile TYPE string;
DEFINE FIELD photo_url ON TABLE profile TYPE option<string>;
DEFINE FIELD role ON TABLE profile TYPE string \
    ASSERT $value IN ['admin', 'staff', 'user'];
DEFINE FIELD created_at ON TABLE profile TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE profile TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_profile_role ON TABLE profile COLUMNS role;

-- =======================================================================
-- Services (catalog, admin-managed)
-- =======================================================================
DEFINE TABLE service SCHEMAFULL;
DEFINE FIELD title ON TABLE service TYPE string;
DEFINE FIELD description ON TABLE service TYPE string;
DEFINE FIELD department ON TABLE service TYPE string;
DEFINE FIELD fees ON TABLE service TYPE int;
DEFINE FIELD processing_time_days ON TABLE service TYPE int;
DEFINE FIELD validity_days ON TABLE service TYPE int;
DEFINE FIELD document_required ON TABLE service TYPE string;
DEFINE FIELD eligibility ON TABLE service TYPE string;
DEFINE FIELD start_date ON TABLE service TYPE datetime;
DEFINE FIELD end_date ON TABLE service TYPE option<datetime>;
DEFINE FIELD is_active ON TABLE service TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE service TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE service TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Applications (snapshot fields copied at apply time)
-- =======================================================================
DEFINE TABLE application SCHEMAFULL;
DEFINE FIELD service_id ON TABLE application TYPE string;
DEFINE FIELD service_name ON TABLE application TYPE string;
DEFINE FIELD user_id ON TABLE application TYPE string;
DEFINE FIELD user_name ON TABLE application TYPE string;
DEFINE FIELD fees ON TABLE application TYPE int;
DEFINE FIELD status ON TABLE application TYPE string \
    ASSERT $value IN ['pending', 'approved', 'rejected'];
DEFINE FIELD documents ON TABLE application TYPE array DEFAULT [];
DEFINE FIELD documents.* ON TABLE application TYPE string;
DEFINE FIELD updated_by ON TABLE application TYPE option<string>;
DEFINE FIELD created_at ON TABLE application TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE application TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_application_user ON TABLE application \
    COLUMNS user_id;

-- =======================================================================
-- Sessions (auth provider)
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD identity_id ON TABLE session TYPE string;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token ON TABLE session \
    COLUMNS token_hash UNIQUE;
DEFINE INDEX idx_session_identity ON TABLE session \
    COLUMNS identity_id;

-- =======================================================================
-- Password reset tickets (single-use)
-- =======================================================================
DEFINE TABLE password_reset SCHEMAFULL;
DEFINE FIELD identity_id ON TABLE password_reset TYPE string;
DEFINE FIELD token_hash ON TABLE password_reset TYPE string;
DEFINE FIELD expires_at ON TABLE password_reset TYPE datetime;
DEFINE FIELD created_at ON TABLE password_reset TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_reset_token ON TABLE password_reset \
    COLUMNS token_hash UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn closed_sets_are_asserted() {
        assert!(SCHEMA_V1.contains("'admin', 'staff', 'user'"));
        assert!(SCHEMA_V1.contains("'pending', 'approved', 'rejected'"));
    }
}
