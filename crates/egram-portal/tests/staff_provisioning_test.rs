//! Integration tests for the staff provisioning flow — in particular
//! the guarantee that the admin is re-authenticated no matter where
//! the intervening steps fail.

use egram_auth::{AuthConfig, AuthService};
use egram_core::error::PortalError;
use egram_core::models::profile::{CreateProfile, Role};
use egram_core::repository::{Pagination, ProfileRepository};
use egram_db::repository::{
    SurrealIdentityRepository, SurrealPasswordResetRepository, SurrealProfileRepository,
    SurrealSessionRepository,
};
use egram_portal::{NewStaff, StaffProvisioner};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

type Db = surrealdb::engine::local::Db;

const ADMIN_PASSWORD: &str = "admin-horse-battery";

struct Ctx {
    auth: AuthService<
        SurrealIdentityRepository<Db>,
        SurrealSessionRepository<Db>,
        SurrealPasswordResetRepository<Db>,
    >,
    provisioner: StaffProvisioner<
        SurrealIdentityRepository<Db>,
        SurrealSessionRepository<Db>,
        SurrealPasswordResetRepository<Db>,
        SurrealProfileRepository<Db>,
    >,
    profiles: SurrealProfileRepository<Db>,
    admin_token: String,
}

/// Spin up the store, create a signed-in admin, and build the
/// provisioner around the shared auth service.
async fn setup() -> Ctx {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    egram_db::run_migrations(&db).await.unwrap();

    let auth = AuthService::new(
        SurrealIdentityRepository::new(db.clone()),
        SurrealSessionRepository::new(db.clone()),
        SurrealPasswordResetRepository::new(db.clone()),
        AuthConfig::default(),
    );
    let profiles = SurrealProfileRepository::new(db);

    let admin_identity = auth
        .sign_up("admin@example.com", ADMIN_PASSWORD)
        .await
        .unwrap();
    profiles
        .create(CreateProfile {
            identity_id: admin_identity.id,
            full_name: "Portal Admin".into(),
            email: "admin@example.com".into(),
            phone: "9876543210".into(),
            address: "Panchayat office".into(),
            photo_url: None,
            role: Role::Admin,
        })
        .await
        .unwrap();

    let admin_session = auth
        .sign_in("admin@example.com", ADMIN_PASSWORD)
        .await
        .unwrap();

    let provisioner = StaffProvisioner::new(auth.clone(), profiles.clone());

    Ctx {
        auth,
        provisioner,
        profiles,
        admin_token: admin_session.token,
    }
}

fn new_staff() -> NewStaff {
    NewStaff {
        full_name: "Ravi Kumar".into(),
        email: "ravi@example.com".into(),
        password: "staff-horse-battery".into(),
        phone: "9876543211".into(),
    }
}

#[tokio::test]
async fn provisioning_happy_path() {
    let ctx = setup().await;

    let outcome = ctx
        .provisioner
        .provision_staff(&ctx.admin_token, ADMIN_PASSWORD, new_staff())
        .await
        .unwrap();

    let staff = outcome.staff.unwrap();
    assert_eq!(staff.role, Role::Staff);
    assert_eq!(staff.email, "ravi@example.com");

    // The admin holds a fresh session; the one passed in is gone.
    let current = ctx
        .auth
        .current_identity(&outcome.admin_session.token)
        .await
        .unwrap();
    assert!(current.is_some(), "admin must be re-authenticated");
    assert!(
        ctx.auth
            .current_identity(&ctx.admin_token)
            .await
            .unwrap()
            .is_none(),
        "the original admin session was ended mid-flow"
    );

    // Step 7: the refreshed listing shows the new staff member.
    let directory = ctx
        .provisioner
        .staff_directory(Pagination::default())
        .await
        .unwrap();
    assert_eq!(directory.total, 1);
    assert_eq!(directory.items[0].id, staff.id);

    // The staff member can sign in with their own credentials.
    ctx.auth
        .sign_in("ravi@example.com", "staff-horse-battery")
        .await
        .unwrap();
}

#[tokio::test]
async fn duplicate_staff_email_fails_but_restores_the_admin() {
    let ctx = setup().await;

    // The email is already taken by an existing identity.
    ctx.auth
        .sign_up("ravi@example.com", "unrelated-password")
        .await
        .unwrap();

    let outcome = ctx
        .provisioner
        .provision_staff(&ctx.admin_token, ADMIN_PASSWORD, new_staff())
        .await
        .unwrap();

    let err = outcome.staff.unwrap_err();
    assert!(
        matches!(err, PortalError::AlreadyExists { .. }),
        "expected AlreadyExists, got: {err:?}"
    );

    // The admin session is intact (re-authenticated) — no lockout.
    let current = ctx
        .auth
        .current_identity(&outcome.admin_session.token)
        .await
        .unwrap();
    assert!(current.is_some());

    // The staff listing is unchanged.
    let directory = ctx
        .provisioner
        .staff_directory(Pagination::default())
        .await
        .unwrap();
    assert_eq!(directory.total, 0);
}

#[tokio::test]
async fn wrong_admin_password_is_reported_as_a_lockout() {
    let ctx = setup().await;

    let err = ctx
        .provisioner
        .provision_staff(&ctx.admin_token, "not-the-admin-password", new_staff())
        .await
        .unwrap_err();

    match err {
        PortalError::AdminLockout { provision, restore } => {
            // Provisioning itself succeeded; only the restore failed.
            assert!(provision.is_none(), "provisioning error: {provision:?}");
            assert!(!restore.is_empty());
        }
        other => panic!("expected AdminLockout, got {other:?}"),
    }
}

#[tokio::test]
async fn validation_failure_leaves_the_admin_session_untouched() {
    let ctx = setup().await;

    let mut input = new_staff();
    input.phone = String::new();

    let err = ctx
        .provisioner
        .provision_staff(&ctx.admin_token, ADMIN_PASSWORD, input)
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Validation { .. }));

    // Fail-fast happened before the sign-out: the original session
    // still works.
    let current = ctx.auth.current_identity(&ctx.admin_token).await.unwrap();
    assert!(current.is_some());
}

#[tokio::test]
async fn only_admins_may_provision_staff() {
    let ctx = setup().await;

    // A citizen with a live session tries the flow.
    let citizen_identity = ctx
        .auth
        .sign_up("asha@example.com", "citizen-password-1")
        .await
        .unwrap();
    ctx.profiles
        .create(CreateProfile {
            identity_id: citizen_identity.id,
            full_name: "Asha Patel".into(),
            email: "asha@example.com".into(),
            phone: "9876543212".into(),
            address: "Ward 4, Rampur".into(),
            photo_url: None,
            role: Role::User,
        })
        .await
        .unwrap();

    let citizen_session = ctx
        .auth
        .sign_in("asha@example.com", "citizen-password-1")
        .await
        .unwrap();

    let err = ctx
        .provisioner
        .provision_staff(&citizen_session.token, "citizen-password-1", new_staff())
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::AuthorizationDenied { .. }));

    // The gate fired before any session side effect: the citizen's
    // session was never touched.
    let current = ctx
        .auth
        .current_identity(&citizen_session.token)
        .await
        .unwrap();
    assert!(current.is_some());
}

#[tokio::test]
async fn dead_admin_token_is_an_authentication_failure() {
    let ctx = setup().await;

    ctx.auth.sign_out(&ctx.admin_token).await.unwrap();

    let err = ctx
        .provisioner
        .provision_staff(&ctx.admin_token, ADMIN_PASSWORD, new_staff())
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::AuthenticationFailed { .. }));
}
