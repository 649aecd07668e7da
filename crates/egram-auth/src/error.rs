//! Authentication error types.

use egram_core::error::PortalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("session has expired")]
    SessionExpired,

    #[error("invalid session: {0}")]
    SessionInvalid(String),

    #[error("password reset ticket has expired")]
    ResetTicketExpired,

    #[error("invalid password reset ticket: {0}")]
    ResetTicketInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for PortalError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::SessionExpired
            | AuthError::SessionInvalid(_)
            | AuthError::ResetTicketExpired
            | AuthError::ResetTicketInvalid(_) => PortalError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => PortalError::Internal(msg),
        }
    }
}
