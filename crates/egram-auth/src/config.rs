//! Authentication configuration.

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session lifetime in seconds (default: 86_400 = 24 hours).
    pub session_lifetime_secs: u64,
    /// Password reset ticket lifetime in seconds (default: 3600 = 1 hour).
    pub reset_ticket_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id verification.
    /// Must match the pepper configured on the identity repository.
    pub pepper: Option<String>,
    /// Minimum password length for policy enforcement.
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_lifetime_secs: 86_400,
            reset_ticket_lifetime_secs: 3_600,
            pepper: None,
            min_password_length: 8,
        }
    }
}
