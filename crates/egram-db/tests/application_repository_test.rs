//! Integration tests for the Application repository using in-memory
//! SurrealDB.

use egram_core::error::PortalError;
use egram_core::models::application::{ApplicationStatus, CreateApplication, StatusChange};
use egram_core::repository::{ApplicationRepository, Pagination};
use egram_db::repository::SurrealApplicationRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    egram_db::run_migrations(&db).await.unwrap();
    db
}

fn application_input(user_id: Uuid) -> CreateApplication {
    CreateApplication {
        service_id: Uuid::new_v4(),
        service_name: "Birth Certificate".into(),
        user_id,
        user_name: "Asha Patel".into(),
        fees: 100,
    }
}

#[tokio::test]
async fn create_starts_pending_with_no_reviewer() {
    let db = setup().await;
    let repo = SurrealApplicationRepository::new(db);

    let application = repo.create(application_input(Uuid::new_v4())).await.unwrap();

    assert_eq!(application.status, ApplicationStatus::Pending);
    assert!(application.documents.is_empty());
    assert!(application.updated_by.is_none());
    assert_eq!(application.service_name, "Birth Certificate");
    assert_eq!(application.fees, 100);

    // Round-trip: reading back returns the same fields plus
    // server-assigned timestamps.
    let fetched = repo.get_by_id(application.id).await.unwrap();
    assert_eq!(fetched.user_name, "Asha Patel");
    assert_eq!(fetched.created_at, application.created_at);
}

#[tokio::test]
async fn any_status_is_reachable_from_any_status() {
    let db = setup().await;
    let repo = SurrealApplicationRepository::new(db);

    let application = repo.create(application_input(Uuid::new_v4())).await.unwrap();

    // The transition table is fully permissive — including moves out
    // of a terminal state. Walk a path that exercises every edge kind.
    let path = [
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
        ApplicationStatus::Pending,
        ApplicationStatus::Rejected,
        ApplicationStatus::Approved,
        ApplicationStatus::Pending,
    ];

    for status in path {
        let updated = repo
            .set_status(
                application.id,
                StatusChange {
                    status,
                    updated_by: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, status);
    }
}

#[tokio::test]
async fn reviewer_stamp_is_set_and_cleared() {
    let db = setup().await;
    let repo = SurrealApplicationRepository::new(db);
    let staff_id = Uuid::new_v4();

    let application = repo.create(application_input(Uuid::new_v4())).await.unwrap();

    // Staff review stamps the reviewer.
    let reviewed = repo
        .set_status(
            application.id,
            StatusChange {
                status: ApplicationStatus::Approved,
                updated_by: Some(staff_id),
            },
        )
        .await
        .unwrap();
    assert_eq!(reviewed.updated_by, Some(staff_id));
    assert!(reviewed.updated_at >= application.updated_at);

    // A later admin review clears it.
    let re_reviewed = repo
        .set_status(
            application.id,
            StatusChange {
                status: ApplicationStatus::Pending,
                updated_by: None,
            },
        )
        .await
        .unwrap();
    assert!(re_reviewed.updated_by.is_none());
}

#[tokio::test]
async fn concurrent_writers_are_last_write_wins() {
    let db = setup().await;
    let repo = SurrealApplicationRepository::new(db);

    let application = repo.create(application_input(Uuid::new_v4())).await.unwrap();

    // Two reviewers race with no version check; the second write
    // silently overwrites the first.
    repo.set_status(
        application.id,
        StatusChange {
            status: ApplicationStatus::Approved,
            updated_by: Some(Uuid::new_v4()),
        },
    )
    .await
    .unwrap();

    let second = Uuid::new_v4();
    repo.set_status(
        application.id,
        StatusChange {
            status: ApplicationStatus::Rejected,
            updated_by: Some(second),
        },
    )
    .await
    .unwrap();

    let fetched = repo.get_by_id(application.id).await.unwrap();
    assert_eq!(fetched.status, ApplicationStatus::Rejected);
    assert_eq!(fetched.updated_by, Some(second));
}

#[tokio::test]
async fn list_by_user_filters_store_side() {
    let db = setup().await;
    let repo = SurrealApplicationRepository::new(db);
    let asha = Uuid::new_v4();
    let ravi = Uuid::new_v4();

    for _ in 0..3 {
        repo.create(application_input(asha)).await.unwrap();
    }
    repo.create(application_input(ravi)).await.unwrap();

    let mine = repo.list_by_user(asha, Pagination::default()).await.unwrap();
    assert_eq!(mine.total, 3);
    assert!(mine.items.iter().all(|a| a.user_id == asha));

    let all = repo.list(Pagination::default()).await.unwrap();
    assert_eq!(all.total, 4);
}

#[tokio::test]
async fn updating_a_missing_application_is_not_found() {
    let db = setup().await;
    let repo = SurrealApplicationRepository::new(db);

    let err = repo
        .set_status(
            Uuid::new_v4(),
            StatusChange {
                status: ApplicationStatus::Approved,
                updated_by: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PortalError::NotFound { .. }));
}
