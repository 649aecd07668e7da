//! Authentication service — sign-up, sign-in/out, session lookup, and
//! password reset orchestration.

use chrono::{DateTime, Duration, Utc};
use egram_core::error::{PortalError, PortalResult};
use egram_core::models::identity::{CreateIdentity, Identity};
use egram_core::models::reset::CreatePasswordReset;
use egram_core::models::session::CreateSession;
use egram_core::repository::{IdentityRepository, PasswordResetRepository, SessionRepository};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Capacity of the session event channel. Events are best-effort
/// notifications; a lagging subscriber drops the oldest ones.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Session start/end notification, consumed by the UI layer to re-run
/// role resolution on every session change.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    SignedIn { identity: Uuid },
    SignedOut { identity: Uuid },
}

/// A live session handle. The raw token is returned here once and
/// never stored anywhere.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Raw opaque session token (return to client, not stored).
    pub token: String,
    pub session_id: Uuid,
    pub identity_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// A password reset ticket. Delivery (e.g. by email) is the caller's
/// concern; this repo only mints and consumes tickets.
#[derive(Debug, Clone)]
pub struct ResetTicket {
    /// Raw opaque ticket (hand to the delivery channel, not stored).
    pub token: String,
    pub identity_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate. Clones share the session
/// event channel.
#[derive(Clone)]
pub struct AuthService<I, S, R>
where
    I: IdentityRepository,
    S: SessionRepository,
    R: PasswordResetRepository,
{
    identities: I,
    sessions: S,
    resets: R,
    config: AuthConfig,
    events: broadcast::Sender<SessionEvent>,
}

impl<I, S, R> AuthService<I, S, R>
where
    I: IdentityRepository,
    S: SessionRepository,
    R: PasswordResetRepository,
{
    pub fn new(identities: I, sessions: S, resets: R, config: AuthConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            identities,
            sessions,
            resets,
            config,
            events,
        }
    }

    /// Subscribe to session start/end notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Create a new identity for an email/password pair.
    ///
    /// Creating an identity does not open a session — callers sign in
    /// explicitly. A duplicate email surfaces as `AlreadyExists`.
    pub async fn sign_up(&self, email: &str, password: &str) -> PortalResult<Identity> {
        if email.trim().is_empty() {
            return Err(PortalError::Validation {
                message: "email must not be empty".into(),
            });
        }
        if password.len() < self.config.min_password_length {
            return Err(PortalError::Validation {
                message: format!(
                    "password must be at least {} characters",
                    self.config.min_password_length
                ),
            });
        }

        self.identities
            .create(CreateIdentity {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
    }

    /// Authenticate an email/password pair and open a session.
    pub async fn sign_in(&self, email: &str, password: &str) -> PortalResult<AuthSession> {
        // 1. Look up the identity; an unknown email reads the same as
        //    a wrong password.
        let identity = match self.identities.get_by_email(email).await {
            Ok(identity) => identity,
            Err(PortalError::NotFound { .. }) => return Err(AuthError::InvalidCredentials.into()),
            Err(e) => return Err(e),
        };

        // 2. Verify password.
        let valid = password::verify_password(
            password,
            &identity.password_hash,
            self.config.pepper.as_deref(),
        )?;

        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Mint an opaque session token and store its hash.
        let raw_token = token::generate_token();
        let token_hash = token::hash_token(&raw_token);
        let expires_at = Utc::now() + Duration::seconds(self.config.session_lifetime_secs as i64);

        let session = self
            .sessions
            .create(CreateSession {
                identity_id: identity.id,
                token_hash,
                expires_at,
            })
            .await?;

        let _ = self.events.send(SessionEvent::SignedIn {
            identity: identity.id,
        });

        Ok(AuthSession {
            token: raw_token,
            session_id: session.id,
            identity_id: identity.id,
            expires_at: session.expires_at,
        })
    }

    /// End the session behind a raw token.
    ///
    /// Signing out an unknown or already-ended session is a no-op
    /// success.
    pub async fn sign_out(&self, raw_token: &str) -> PortalResult<()> {
        let token_hash = token::hash_token(raw_token);
        let session = match self.sessions.get_by_token_hash(&token_hash).await {
            Ok(session) => session,
            Err(PortalError::NotFound { .. }) => return Ok(()),
            Err(e) => return Err(e),
        };

        self.sessions.invalidate(session.id).await?;

        let _ = self.events.send(SessionEvent::SignedOut {
            identity: session.identity_id,
        });

        Ok(())
    }

    /// Resolve a raw token to its authenticated identity, if any.
    ///
    /// Expired sessions are invalidated on sight and report `None`.
    pub async fn current_identity(&self, raw_token: &str) -> PortalResult<Option<Uuid>> {
        let token_hash = token::hash_token(raw_token);
        let session = match self.sessions.get_by_token_hash(&token_hash).await {
            Ok(session) => session,
            Err(PortalError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        if session.expires_at <= Utc::now() {
            let _ = self.sessions.invalidate(session.id).await;
            return Ok(None);
        }

        Ok(Some(session.identity_id))
    }

    /// Mint a single-use password reset ticket for an email.
    ///
    /// Delivery is outside this repo. An unknown email returns a typed
    /// `NotFound` so the caller layer decides what to disclose.
    pub async fn request_password_reset(&self, email: &str) -> PortalResult<ResetTicket> {
        let identity = self.identities.get_by_email(email).await?;

        let raw_token = token::generate_token();
        let token_hash = token::hash_token(&raw_token);
        let expires_at =
            Utc::now() + Duration::seconds(self.config.reset_ticket_lifetime_secs as i64);

        let ticket = self
            .resets
            .create(CreatePasswordReset {
                identity_id: identity.id,
                token_hash,
                expires_at,
            })
            .await?;

        Ok(ResetTicket {
            token: raw_token,
            identity_id: ticket.identity_id,
            expires_at: ticket.expires_at,
        })
    }

    /// Consume a reset ticket, replace the credential, and revoke every
    /// open session for the identity.
    pub async fn complete_password_reset(
        &self,
        raw_ticket: &str,
        new_password: &str,
    ) -> PortalResult<()> {
        if new_password.len() < self.config.min_password_length {
            return Err(PortalError::Validation {
                message: format!(
                    "password must be at least {} characters",
                    self.config.min_password_length
                ),
            });
        }

        let token_hash = token::hash_token(raw_ticket);
        let ticket = self
            .resets
            .get_by_token_hash(&token_hash)
            .await
            .map_err(|e| match e {
                PortalError::NotFound { .. } => {
                    AuthError::ResetTicketInvalid("ticket not found or already used".into()).into()
                }
                other => other,
            })?;

        if ticket.expires_at <= Utc::now() {
            let _ = self.resets.consume(ticket.id).await;
            return Err(AuthError::ResetTicketExpired.into());
        }

        // Single-use: consume before the credential write so a retry
        // with the same ticket fails.
        self.resets.consume(ticket.id).await?;

        self.identities
            .set_password(ticket.identity_id, new_password)
            .await?;

        self.sessions
            .invalidate_identity_sessions(ticket.identity_id)
            .await?;

        Ok(())
    }
}
