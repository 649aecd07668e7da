//! Role gate helpers shared by the portal flows.

use egram_core::error::{PortalError, PortalResult};
use egram_core::models::profile::{Role, UserProfile};
use egram_core::repository::ProfileRepository;
use uuid::Uuid;

/// Fetch the acting identity's profile.
///
/// Authorization is a pure function of the profile's role tag, so
/// every gated flow starts here. An actor without a profile is a hard
/// error, not a silent no-op.
pub(crate) async fn actor_profile<P: ProfileRepository>(
    profiles: &P,
    actor: Uuid,
) -> PortalResult<UserProfile> {
    profiles.get_by_id(actor).await.map_err(|e| match e {
        PortalError::NotFound { .. } => PortalError::ProfileMissing {
            identity: actor.to_string(),
        },
        other => other,
    })
}

pub(crate) fn deny(action: &str, role: Role) -> PortalError {
    PortalError::AuthorizationDenied {
        reason: format!("role '{}' may not {action}", role.as_str()),
    }
}
