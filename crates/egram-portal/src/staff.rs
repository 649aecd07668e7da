//! Staff provisioning — the one multi-step flow that ends the acting
//! admin's session mid-operation and must guarantee it comes back.

use egram_auth::{AuthService, AuthSession};
use egram_core::error::{PortalError, PortalResult};
use egram_core::models::profile::{CreateProfile, Role, UserProfile};
use egram_core::repository::{
    IdentityRepository, PaginatedResult, Pagination, PasswordResetRepository, ProfileRepository,
    SessionRepository,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::authz;

#[derive(Debug, Clone)]
pub struct NewStaff {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

/// Outcome of a provisioning run.
///
/// The admin session is always fresh: the flow ends every run by
/// re-authenticating the admin, whether or not the provisioning steps
/// succeeded. The session passed in is gone either way.
#[derive(Debug)]
pub struct ProvisionOutcome {
    /// The created staff profile, or the error from the provisioning
    /// steps. The admin is re-authenticated in both cases.
    pub staff: PortalResult<UserProfile>,
    /// Replacement session for the admin.
    pub admin_session: AuthSession,
}

pub struct StaffProvisioner<I, S, R, P>
where
    I: IdentityRepository,
    S: SessionRepository,
    R: PasswordResetRepository,
    P: ProfileRepository,
{
    auth: AuthService<I, S, R>,
    profiles: P,
    /// Serializes the sign-out → re-authenticate critical section. No
    /// other privileged provisioning may interleave with it.
    lock: Mutex<()>,
}

impl<I, S, R, P> StaffProvisioner<I, S, R, P>
where
    I: IdentityRepository,
    S: SessionRepository,
    R: PasswordResetRepository,
    P: ProfileRepository,
{
    pub fn new(auth: AuthService<I, S, R>, profiles: P) -> Self {
        Self {
            auth,
            profiles,
            lock: Mutex::new(()),
        }
    }

    /// Provision a staff account.
    ///
    /// Ordered contract: capture the admin's email and supplied
    /// password; validate the staff fields; end the admin session;
    /// create the staff identity; persist the staff profile;
    /// re-authenticate the admin. The final step runs regardless of
    /// failures in the two before it — an admin is never left locked
    /// out by a duplicate staff email or a rejected write.
    ///
    /// Errors returned at the outer level occur before any session
    /// side effect (bad token, non-admin actor, field validation),
    /// with one exception: [`PortalError::AdminLockout`] means
    /// re-authentication itself failed and carries both causes.
    pub async fn provision_staff(
        &self,
        admin_token: &str,
        admin_password: &str,
        input: NewStaff,
    ) -> PortalResult<ProvisionOutcome> {
        // Step 1: resolve the acting admin and capture their email.
        // The password must be supplied interactively — a live session
        // does not expose it.
        let admin_id = match self.auth.current_identity(admin_token).await? {
            Some(id) => id,
            None => {
                return Err(PortalError::AuthenticationFailed {
                    reason: "no active session".into(),
                });
            }
        };
        let admin_profile = authz::actor_profile(&self.profiles, admin_id).await?;
        if admin_profile.role != Role::Admin {
            return Err(authz::deny("provision staff accounts", admin_profile.role));
        }
        let admin_email = admin_profile.email;

        // Step 2: fail fast on missing fields, before any side effect.
        for (field, value) in [
            ("full name", &input.full_name),
            ("email", &input.email),
            ("password", &input.password),
            ("phone", &input.phone),
        ] {
            if value.trim().is_empty() {
                return Err(PortalError::Validation {
                    message: format!("staff {field} must not be empty"),
                });
            }
        }

        // Steps 3-6 are a critical section: the admin has no live
        // session inside it.
        let _guard = self.lock.lock().await;

        // Step 3: end the admin's session.
        self.auth.sign_out(admin_token).await?;

        // Steps 4-5: create the staff identity and persist its profile.
        let provision: PortalResult<UserProfile> = async {
            let staff_identity = self
                .auth
                .sign_up(&input.email, &input.password)
                .await?;

            self.profiles
                .create(CreateProfile {
                    identity_id: staff_identity.id,
                    full_name: input.full_name.clone(),
                    email: input.email.clone(),
                    phone: input.phone.clone(),
                    address: String::new(),
                    photo_url: None,
                    role: Role::Staff,
                })
                .await
        }
        .await;

        // Step 6: re-authenticate the admin. Runs on success and on
        // failure of steps 4-5 alike.
        let restore = self.auth.sign_in(&admin_email, admin_password).await;

        match (provision, restore) {
            (staff, Ok(admin_session)) => {
                match &staff {
                    Ok(profile) => {
                        info!(staff_id = %profile.id, "Staff account provisioned")
                    }
                    Err(e) => {
                        warn!(error = %e, "Staff provisioning failed; admin re-authenticated")
                    }
                }
                Ok(ProvisionOutcome {
                    staff,
                    admin_session,
                })
            }
            (provision, Err(restore_err)) => {
                warn!(error = %restore_err, "Admin re-authentication failed after provisioning");
                Err(PortalError::AdminLockout {
                    provision: provision.err().map(|e| e.to_string()),
                    restore: restore_err.to_string(),
                })
            }
        }
    }

    /// Step 7: the refreshed staff listing. Also serves the public
    /// staff directory — a store-side role predicate, not a
    /// full-collection fetch.
    pub async fn staff_directory(
        &self,
        pagination: Pagination,
    ) -> PortalResult<PaginatedResult<UserProfile>> {
        self.profiles.list_by_role(Role::Staff, pagination).await
    }
}
