//! Session/role resolution — maps an authenticated identity to the
//! dashboard surface it is routed to.
//!
//! Resolution is re-derived from live state on every call; nothing is
//! cached across calls.

use egram_core::error::{PortalError, PortalResult};
use egram_core::models::profile::Role;
use egram_core::repository::{
    IdentityRepository, PasswordResetRepository, ProfileRepository, SessionRepository,
};
use uuid::Uuid;

use crate::error::AuthError;
use crate::service::AuthService;

/// The surface an authenticated principal lands on.
///
/// Exhaustive over the closed role set: there is no fallthrough arm,
/// so an unrepresentable role can never silently dead-end here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dashboard {
    Admin,
    Staff,
    /// The citizen surface is parameterized by the identity itself.
    Citizen { profile_id: Uuid },
}

impl Dashboard {
    /// The UI route this surface maps to.
    pub fn route(&self) -> String {
        match self {
            Dashboard::Admin => "/admin".into(),
            Dashboard::Staff => "/staff".into(),
            Dashboard::Citizen { profile_id } => format!("/user/{profile_id}"),
        }
    }
}

/// Resolves an authenticated identity to its dashboard.
#[derive(Clone)]
pub struct RoleResolver<P: ProfileRepository> {
    profiles: P,
}

impl<P: ProfileRepository> RoleResolver<P> {
    pub fn new(profiles: P) -> Self {
        Self { profiles }
    }

    /// Fetch the identity's profile and branch on its role.
    ///
    /// A missing profile is a hard [`PortalError::ProfileMissing`]
    /// error: no account is reachable without one.
    pub async fn resolve(&self, identity: Uuid) -> PortalResult<Dashboard> {
        let profile = self
            .profiles
            .get_by_id(identity)
            .await
            .map_err(|e| match e {
                PortalError::NotFound { .. } => PortalError::ProfileMissing {
                    identity: identity.to_string(),
                },
                other => other,
            })?;

        Ok(match profile.role {
            Role::Admin => Dashboard::Admin,
            Role::Staff => Dashboard::Staff,
            Role::User => Dashboard::Citizen {
                profile_id: profile.id,
            },
        })
    }

    /// Resolve a raw session token: session lookup, then role branch.
    ///
    /// An absent or expired session is an authentication failure, not a
    /// missing profile.
    pub async fn resolve_session<I, S, R>(
        &self,
        auth: &AuthService<I, S, R>,
        raw_token: &str,
    ) -> PortalResult<Dashboard>
    where
        I: IdentityRepository,
        S: SessionRepository,
        R: PasswordResetRepository,
    {
        match auth.current_identity(raw_token).await? {
            Some(identity) => self.resolve(identity).await,
            None => Err(AuthError::SessionInvalid("no active session".into()).into()),
        }
    }
}
