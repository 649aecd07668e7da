//! Application lifecycle — citizens apply, admin and staff review.

use egram_core::error::PortalResult;
use egram_core::models::application::{Application, ApplicationStatus, CreateApplication, StatusChange};
use egram_core::models::profile::Role;
use egram_core::repository::{
    ApplicationRepository, PaginatedResult, Pagination, ProfileRepository, ServiceRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::authz;

pub struct ApplicationDesk<P, V, A>
where
    P: ProfileRepository,
    V: ServiceRepository,
    A: ApplicationRepository,
{
    profiles: P,
    services: V,
    applications: A,
}

impl<P, V, A> ApplicationDesk<P, V, A>
where
    P: ProfileRepository,
    V: ServiceRepository,
    A: ApplicationRepository,
{
    pub fn new(profiles: P, services: V, applications: A) -> Self {
        Self {
            profiles,
            services,
            applications,
        }
    }

    /// Apply to a service on behalf of the acting citizen.
    ///
    /// Read-before-write: the target service must still exist. Its
    /// current title and fees, and the applicant's current full name,
    /// are copied into the new record — a deliberate snapshot, not a
    /// live reference.
    pub async fn apply(&self, applicant: Uuid, service_id: Uuid) -> PortalResult<Application> {
        let profile = authz::actor_profile(&self.profiles, applicant).await?;
        if profile.role != Role::User {
            return Err(authz::deny("apply for services", profile.role));
        }

        let service = self.services.get_by_id(service_id).await?;

        let application = self
            .applications
            .create(CreateApplication {
                service_id,
                service_name: service.title,
                user_id: profile.id,
                user_name: profile.full_name,
                fees: service.fees,
            })
            .await?;

        info!(
            application_id = %application.id,
            service_id = %service_id,
            "Application submitted"
        );
        Ok(application)
    }

    /// Move an application to a new review status. Admin and staff only.
    ///
    /// Any status may be written from any prior status — the table is
    /// fully permissive, including terminal → pending. `updated_by` is
    /// stamped for staff reviewers and cleared for admin reviewers.
    /// There is no version check: concurrent reviewers overwrite each
    /// other, last write wins.
    pub async fn update_status(
        &self,
        actor: Uuid,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> PortalResult<Application> {
        let profile = authz::actor_profile(&self.profiles, actor).await?;
        if !profile.role.reviews_applications() {
            return Err(authz::deny("review applications", profile.role));
        }

        let updated_by = match profile.role {
            Role::Staff => Some(profile.id),
            _ => None,
        };

        self.applications
            .set_status(application_id, StatusChange { status, updated_by })
            .await
    }

    /// The acting citizen's own applications.
    pub async fn my_applications(
        &self,
        applicant: Uuid,
        pagination: Pagination,
    ) -> PortalResult<PaginatedResult<Application>> {
        self.applications.list_by_user(applicant, pagination).await
    }

    /// The full review queue. Admin and staff only.
    pub async fn review_queue(
        &self,
        actor: Uuid,
        pagination: Pagination,
    ) -> PortalResult<PaginatedResult<Application>> {
        let profile = authz::actor_profile(&self.profiles, actor).await?;
        if !profile.role.reviews_applications() {
            return Err(authz::deny("review applications", profile.role));
        }

        self.applications.list(pagination).await
    }
}
