//! Login and per-request authentication.

use chrono::Utc;

use logipilot_auth::account::normalize_email;
use logipilot_auth::{Account, AuthError, gate, password};
use logipilot_infra::{AccountStore, Store};

use crate::error::ServiceError;
use crate::services::Services;

/// Outcome of a successful login: the bearer token plus the account it was
/// issued to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub account: Account,
}

impl<S: Store> Services<S> {
    /// Verify credentials and issue a bearer token.
    ///
    /// Unknown email and wrong password fail identically, so a caller cannot
    /// probe which addresses have accounts. The token embeds the account's
    /// role at this instant; later role changes win over the claim.
    pub async fn login(&self, email: &str, password_plain: &str) -> Result<Session, ServiceError> {
        let email = normalize_email(email);
        let account = AccountStore::account_by_email(&self.store, &email).await?;

        let Some(account) = account else {
            // Burn a verification anyway so the miss costs as much as a hit.
            let _ = password::verify(password_plain, DUMMY_HASH);
            return Err(AuthError::InvalidCredentials.into());
        };

        if !password::verify(password_plain, &account.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }

        if !account.active {
            return Err(AuthError::InactiveAccount.into());
        }

        let token = self.tokens.issue(account.id, account.role, Utc::now())?;
        Ok(Session { token, account })
    }

    /// Resolve a bearer token to its current account.
    ///
    /// The store is the source of truth for role and active status; token
    /// claims are advisory only.
    pub async fn authenticate(&self, token: &str) -> Result<Account, ServiceError> {
        let account = gate::authenticate(&self.store, &self.tokens, token, Utc::now()).await?;
        Ok(account)
    }
}

// A well-formed bcrypt hash that matches no real password; used to equalize
// the timing of unknown-email and wrong-password failures.
const DUMMY_HASH: &str = "$2b$12$C6UzMDM.H6dfI/f/IKcEeO7art4G1y1kXv2ZUH0hUlD/F1ZYj0O5u";
