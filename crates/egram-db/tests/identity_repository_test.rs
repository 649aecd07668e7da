//! Integration tests for the Identity repository using in-memory SurrealDB.

use egram_core::error::PortalError;
use egram_core::models::identity::CreateIdentity;
use egram_core::repository::IdentityRepository;
use egram_db::repository::SurrealIdentityRepository;
use egram_db::verify_password;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    egram_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn create_and_get_identity() {
    let db = setup().await;
    let repo = SurrealIdentityRepository::new(db);

    let identity = repo
        .create(CreateIdentity {
            email: "asha@example.com".into(),
            password: "SuperSecret123!".into(),
        })
        .await
        .unwrap();

    assert_eq!(identity.email, "asha@example.com");

    // Password should be hashed, not stored in plaintext.
    assert_ne!(identity.password_hash, "SuperSecret123!");
    assert!(identity.password_hash.starts_with("$argon2id$"));

    // Get by ID should return the same identity.
    let fetched = repo.get_by_id(identity.id).await.unwrap();
    assert_eq!(fetched.id, identity.id);
    assert_eq!(fetched.email, "asha@example.com");
}

#[tokio::test]
async fn get_identity_by_email() {
    let db = setup().await;
    let repo = SurrealIdentityRepository::new(db);

    let identity = repo
        .create(CreateIdentity {
            email: "ravi@example.com".into(),
            password: "pass-12345".into(),
        })
        .await
        .unwrap();

    let fetched = repo.get_by_email("ravi@example.com").await.unwrap();
    assert_eq!(fetched.id, identity.id);
}

#[tokio::test]
async fn password_verification() {
    let db = setup().await;
    let repo = SurrealIdentityRepository::new(db);

    let identity = repo
        .create(CreateIdentity {
            email: "meena@example.com".into(),
            password: "MyPassword42!".into(),
        })
        .await
        .unwrap();

    // Correct password should verify.
    assert!(verify_password("MyPassword42!", &identity.password_hash, None).unwrap());

    // Wrong password should not verify.
    assert!(!verify_password("WrongPassword", &identity.password_hash, None).unwrap());
}

#[tokio::test]
async fn password_with_pepper() {
    let db = setup().await;
    let pepper = "server-secret-pepper".to_string();
    let repo = SurrealIdentityRepository::with_pepper(db, pepper.clone());

    let identity = repo
        .create(CreateIdentity {
            email: "kiran@example.com".into(),
            password: "PepperedPass!".into(),
        })
        .await
        .unwrap();

    // Verify with pepper should succeed.
    assert!(verify_password("PepperedPass!", &identity.password_hash, Some(&pepper)).unwrap());

    // Verify without pepper should fail.
    assert!(!verify_password("PepperedPass!", &identity.password_hash, None).unwrap());
}

#[tokio::test]
async fn duplicate_email_is_a_typed_error() {
    let db = setup().await;
    let repo = SurrealIdentityRepository::new(db);

    repo.create(CreateIdentity {
        email: "same@example.com".into(),
        password: "pass-12345".into(),
    })
    .await
    .unwrap();

    let err = repo
        .create(CreateIdentity {
            email: "same@example.com".into(),
            password: "other-pass".into(),
        })
        .await
        .unwrap_err();

    assert!(
        matches!(err, PortalError::AlreadyExists { .. }),
        "expected AlreadyExists, got: {err:?}"
    );
}

#[tokio::test]
async fn set_password_replaces_the_credential() {
    let db = setup().await;
    let repo = SurrealIdentityRepository::new(db);

    let identity = repo
        .create(CreateIdentity {
            email: "devi@example.com".into(),
            password: "old-password-1".into(),
        })
        .await
        .unwrap();

    repo.set_password(identity.id, "new-password-2").await.unwrap();

    let fetched = repo.get_by_id(identity.id).await.unwrap();
    assert!(verify_password("new-password-2", &fetched.password_hash, None).unwrap());
    assert!(!verify_password("old-password-1", &fetched.password_hash, None).unwrap());
}

#[tokio::test]
async fn unknown_identity_is_not_found() {
    let db = setup().await;
    let repo = SurrealIdentityRepository::new(db);

    let err = repo.get_by_email("nobody@example.com").await.unwrap_err();
    assert!(matches!(err, PortalError::NotFound { .. }));
}
