//! Account directory: the authoritative source of account state.

use thiserror::Error;

use logipilot_core::AccountId;

use crate::Account;

/// Directory lookup failure. Infrastructure trouble, not a decision: the
/// boundary layer maps it to an internal failure, never to an auth outcome.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("account directory unavailable: {0}")]
    Unavailable(String),
}

/// Authoritative source of account existence, role, and active status.
///
/// The gate consults this on every request instead of trusting token claims;
/// nothing is cached across requests, so a role downgrade or deactivation is
/// visible immediately. A lookup that finds nothing is `Ok(None)`.
#[async_trait::async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, DirectoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DirectoryError>;
}
