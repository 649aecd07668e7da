//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    egram_db::run_migrations(&db).await.unwrap();

    // Verify that key tables exist by querying INFO FOR DB.
    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(info_str.contains("identity"), "missing identity table");
    assert!(info_str.contains("profile"), "missing profile table");
    assert!(info_str.contains("service"), "missing service table");
    assert!(
        info_str.contains("application"),
        "missing application table"
    );
    assert!(info_str.contains("session"), "missing session table");
    assert!(
        info_str.contains("password_reset"),
        "missing password_reset table"
    );

    // Verify migration was recorded.
    assert!(info_str.contains("_migration"), "missing _migration table");
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    // Run twice — should not fail.
    egram_db::run_migrations(&db).await.unwrap();
    egram_db::run_migrations(&db).await.unwrap();

    // Verify only one migration record exists.
    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1, "expected exactly one migration record");
}

#[tokio::test]
async fn role_assertion_rejects_values_outside_the_closed_set() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    egram_db::run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE profile SET \
             full_name = 'X', email = 'x@example.com', \
             phone = '1', address = 'Y', \
             photo_url = NONE, role = 'superuser'",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "role outside the closed set should be rejected");
}

#[tokio::test]
async fn status_assertion_rejects_values_outside_the_closed_set() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    egram_db::run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE application SET \
             service_id = 's', service_name = 'S', \
             user_id = 'u', user_name = 'U', \
             fees = 10, status = 'archived', \
             documents = [], updated_by = NONE",
        )
        .await
        .unwrap()
        .check();

    assert!(
        result.is_err(),
        "status outside the closed set should be rejected"
    );
}

#[tokio::test]
async fn unique_index_prevents_duplicate_identity_emails() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    egram_db::run_migrations(&db).await.unwrap();

    db.query(
        "CREATE identity SET \
         email = 'dup@example.com', password_hash = 'h1'",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    let result = db
        .query(
            "CREATE identity SET \
             email = 'dup@example.com', password_hash = 'h2'",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "duplicate email should be rejected");
}
