//! Process-wide settings.

use chrono::Duration;

/// Process-wide configuration.
///
/// Constructed once at startup by the embedder and passed by reference into
/// the token service and the bootstrap routine. How the values are sourced
/// (env, files, flags) is the embedder's concern, not this crate's.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Symmetric signing secret for access tokens. Rotating it invalidates
    /// every previously issued token at once.
    pub secret_key: String,

    /// Access token lifetime.
    pub token_ttl: Duration,

    /// Email of the bootstrap administrator account.
    pub admin_email: String,

    /// Initial plaintext password for the bootstrap administrator account.
    pub admin_password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            secret_key: "please-change-in-prod".to_string(),
            token_ttl: Duration::minutes(30),
            admin_email: "admin@logipilot.com".to_string(),
            admin_password: "admin123".to_string(),
        }
    }
}
