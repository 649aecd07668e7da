//! Service catalog administration.
//!
//! Creation, edits, and deletion are admin-only. Reads are ungated:
//! citizens and staff browse the same catalog.

use egram_core::error::{PortalError, PortalResult};
use egram_core::models::service::{CreateService, Service, UpdateService};
use egram_core::repository::{
    PaginatedResult, Pagination, ProfileRepository, ServiceRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::authz;

pub struct ServiceCatalog<P, V>
where
    P: ProfileRepository,
    V: ServiceRepository,
{
    profiles: P,
    services: V,
}

impl<P, V> ServiceCatalog<P, V>
where
    P: ProfileRepository,
    V: ServiceRepository,
{
    pub fn new(profiles: P, services: V) -> Self {
        Self { profiles, services }
    }

    /// Publish a new service. Admin only.
    pub async fn create_service(&self, actor: Uuid, input: CreateService) -> PortalResult<Service> {
        let profile = authz::actor_profile(&self.profiles, actor).await?;
        if !profile.role.manages_catalog() {
            return Err(authz::deny("manage the service catalog", profile.role));
        }

        if input.title.trim().is_empty() {
            return Err(PortalError::Validation {
                message: "service title must not be empty".into(),
            });
        }
        if input.department.trim().is_empty() {
            return Err(PortalError::Validation {
                message: "service department must not be empty".into(),
            });
        }

        let service = self.services.create(input).await?;
        info!(service_id = %service.id, title = %service.title, "Service published");
        Ok(service)
    }

    /// Edit a service in place. Admin only.
    ///
    /// Existing applications keep the title and fees they copied at
    /// apply time; an edit here never reaches them.
    pub async fn update_service(
        &self,
        actor: Uuid,
        service_id: Uuid,
        input: UpdateService,
    ) -> PortalResult<Service> {
        let profile = authz::actor_profile(&self.profiles, actor).await?;
        if !profile.role.manages_catalog() {
            return Err(authz::deny("manage the service catalog", profile.role));
        }

        self.services.update(service_id, input).await
    }

    /// Remove a service. Admin only. Hard delete.
    pub async fn delete_service(&self, actor: Uuid, service_id: Uuid) -> PortalResult<()> {
        let profile = authz::actor_profile(&self.profiles, actor).await?;
        if !profile.role.manages_catalog() {
            return Err(authz::deny("manage the service catalog", profile.role));
        }

        self.services.delete(service_id).await?;
        info!(service_id = %service_id, "Service deleted");
        Ok(())
    }

    pub async fn get_service(&self, service_id: Uuid) -> PortalResult<Service> {
        self.services.get_by_id(service_id).await
    }

    pub async fn browse(&self, pagination: Pagination) -> PortalResult<PaginatedResult<Service>> {
        self.services.list(pagination).await
    }
}
