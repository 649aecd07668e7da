//! Citizen registration — photo upload, identity creation, profile
//! persistence.

use egram_auth::AuthService;
use egram_core::error::{PortalError, PortalResult};
use egram_core::models::profile::{CreateProfile, Role, UserProfile};
use egram_core::repository::{
    IdentityRepository, PasswordResetRepository, ProfileRepository, SessionRepository,
};
use egram_core::storage::PhotoStore;
use tracing::info;

/// An uploaded image, as received from the registration form.
#[derive(Debug, Clone)]
pub struct Photo {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub struct NewCitizen {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub photo: Option<Photo>,
}

pub struct Registrar<I, S, R, P, B>
where
    I: IdentityRepository,
    S: SessionRepository,
    R: PasswordResetRepository,
    P: ProfileRepository,
    B: PhotoStore,
{
    auth: AuthService<I, S, R>,
    profiles: P,
    photos: B,
}

impl<I, S, R, P, B> Registrar<I, S, R, P, B>
where
    I: IdentityRepository,
    S: SessionRepository,
    R: PasswordResetRepository,
    P: ProfileRepository,
    B: PhotoStore,
{
    pub fn new(auth: AuthService<I, S, R>, profiles: P, photos: B) -> Self {
        Self {
            auth,
            profiles,
            photos,
        }
    }

    /// Register a new citizen account.
    ///
    /// The photo is uploaded before any account side effect, so a
    /// storage failure leaves no orphan identity behind. The caller
    /// signs in explicitly afterwards.
    pub async fn register(&self, input: NewCitizen) -> PortalResult<UserProfile> {
        for (field, value) in [
            ("full name", &input.full_name),
            ("email", &input.email),
            ("password", &input.password),
            ("phone", &input.phone),
            ("address", &input.address),
        ] {
            if value.trim().is_empty() {
                return Err(PortalError::Validation {
                    message: format!("{field} must not be empty"),
                });
            }
        }

        let photo_url = match input.photo {
            Some(photo) => Some(self.photos.upload(photo.bytes, &photo.file_name).await?),
            None => None,
        };

        let identity = self.auth.sign_up(&input.email, &input.password).await?;

        let profile = self
            .profiles
            .create(CreateProfile {
                identity_id: identity.id,
                full_name: input.full_name,
                email: input.email,
                phone: input.phone,
                address: input.address,
                photo_url,
                role: Role::User,
            })
            .await?;

        info!(profile_id = %profile.id, "Citizen registered");
        Ok(profile)
    }
}
