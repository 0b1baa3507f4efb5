//! One-time administrative bootstrap.
//!
//! Seeding is an explicit setup step (run by the `logipilot-seed` binary or
//! an operator), never an implicit side effect of serving traffic.

use logipilot_auth::account::normalize_email;
use logipilot_auth::{Account, Role, password};
use logipilot_core::Settings;
use logipilot_infra::{AccountStore, NewAccountRecord, Store};

use crate::error::ServiceError;
use crate::services::Services;

impl<S: Store> Services<S> {
    /// Create the bootstrap administrator iff no account with the configured
    /// email exists.
    ///
    /// Returns the created account, or `None` when one already exists.
    /// Idempotent: safe to run on every deploy.
    pub async fn seed_admin(&self, settings: &Settings) -> Result<Option<Account>, ServiceError> {
        let email = normalize_email(&settings.admin_email);

        if let Some(existing) = AccountStore::account_by_email(&self.store, &email).await? {
            tracing::info!(email = %existing.email, "administrator account already exists, skipping");
            return Ok(None);
        }

        tracing::info!(email = %email, "creating administrator account");

        let record = NewAccountRecord {
            email,
            password_hash: password::hash(&settings.admin_password)?,
            role: Role::Admin,
            active: true,
        };

        Ok(Some(self.store.insert_account(record).await?))
    }
}
