//! SurrealDB repository implementations.

mod application;
mod identity;
mod profile;
mod reset;
mod service;
mod session;

pub use application::SurrealApplicationRepository;
pub use identity::{SurrealIdentityRepository, verify_password};
pub use profile::SurrealProfileRepository;
pub use reset::SurrealPasswordResetRepository;
pub use service::SurrealServiceRepository;
pub use session::SurrealSessionRepository;
