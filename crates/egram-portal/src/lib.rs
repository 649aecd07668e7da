//! Portal flows — service catalog administration, application
//! lifecycle, citizen registration, and staff provisioning.
//!
//! Every flow takes the acting identity explicitly and derives its
//! authorization from the actor's profile role; nothing here holds
//! ambient session state.

pub mod applications;
mod authz;
pub mod catalog;
pub mod photos;
pub mod registration;
pub mod staff;

pub use applications::ApplicationDesk;
pub use catalog::ServiceCatalog;
pub use photos::HttpPhotoStore;
pub use registration::{NewCitizen, Photo, Registrar};
pub use staff::{NewStaff, ProvisionOutcome, StaffProvisioner};
