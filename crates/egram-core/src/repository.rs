//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. There is no tenant dimension:
//! the portal serves a single panchayat.

use uuid::Uuid;

use crate::error::PortalResult;
use crate::models::{
    application::{Application, CreateApplication, StatusChange},
    identity::{CreateIdentity, Identity},
    profile::{CreateProfile, Role, UpdateProfile, UserProfile},
    reset::{CreatePasswordReset, PasswordReset},
    service::{CreateService, Service, UpdateService},
    session::{CreateSession, Session},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Identity provider storage
// ---------------------------------------------------------------------------

pub trait IdentityRepository: Send + Sync {
    /// Create a new identity. The raw password is hashed before
    /// storage; a duplicate email is rejected.
    fn create(&self, input: CreateIdentity) -> impl Future<Output = PortalResult<Identity>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = PortalResult<Identity>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = PortalResult<Identity>> + Send;
    /// Replace the stored credential with a hash of `new_password`.
    fn set_password(
        &self,
        id: Uuid,
        new_password: &str,
    ) -> impl Future<Output = PortalResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Portal collections
// ---------------------------------------------------------------------------

pub trait ProfileRepository: Send + Sync {
    fn create(
        &self,
        input: CreateProfile,
    ) -> impl Future<Output = PortalResult<UserProfile>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = PortalResult<UserProfile>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateProfile,
    ) -> impl Future<Output = PortalResult<UserProfile>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = PortalResult<PaginatedResult<UserProfile>>> + Send;
    /// Store-side role predicate (e.g. the staff directory).
    fn list_by_role(
        &self,
        role: Role,
        pagination: Pagination,
    ) -> impl Future<Output = PortalResult<PaginatedResult<UserProfile>>> + Send;
}

pub trait ServiceRepository: Send + Sync {
    fn create(&self, input: CreateService) -> impl Future<Output = PortalResult<Service>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = PortalResult<Service>> + Send;
    /// Overwrites in place; no versioning.
    fn update(
        &self,
        id: Uuid,
        input: UpdateService,
    ) -> impl Future<Output = PortalResult<Service>> + Send;
    /// Hard delete.
    fn delete(&self, id: Uuid) -> impl Future<Output = PortalResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = PortalResult<PaginatedResult<Service>>> + Send;
}

pub trait ApplicationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateApplication,
    ) -> impl Future<Output = PortalResult<Application>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = PortalResult<Application>> + Send;
    /// Unconditional status write. Last-write-wins: no version check,
    /// concurrent writers silently overwrite each other.
    fn set_status(
        &self,
        id: Uuid,
        change: StatusChange,
    ) -> impl Future<Output = PortalResult<Application>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = PortalResult<PaginatedResult<Application>>> + Send;
    /// Store-side applicant predicate ("my applications").
    fn list_by_user(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = PortalResult<PaginatedResult<Application>>> + Send;
}

// ---------------------------------------------------------------------------
// Auth session storage
// ---------------------------------------------------------------------------

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession) -> impl Future<Output = PortalResult<Session>> + Send;
    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = PortalResult<Session>> + Send;
    /// Invalidate a single session.
    fn invalidate(&self, id: Uuid) -> impl Future<Output = PortalResult<()>> + Send;
    /// Invalidate all sessions for an identity (e.g. on password change).
    fn invalidate_identity_sessions(
        &self,
        identity_id: Uuid,
    ) -> impl Future<Output = PortalResult<()>> + Send;
    /// Remove all expired sessions.
    fn cleanup_expired(&self) -> impl Future<Output = PortalResult<u64>> + Send;
}

pub trait PasswordResetRepository: Send + Sync {
    fn create(
        &self,
        input: CreatePasswordReset,
    ) -> impl Future<Output = PortalResult<PasswordReset>> + Send;
    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = PortalResult<PasswordReset>> + Send;
    /// Delete a ticket (single-use guarantee).
    fn consume(&self, id: Uuid) -> impl Future<Output = PortalResult<()>> + Send;
}
