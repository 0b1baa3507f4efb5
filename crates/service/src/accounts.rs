//! Account administration. Every operation here is administrator-only.

use logipilot_auth::account::{AccountDraft, AccountPatch, normalize_email};
use logipilot_auth::{Account, authorize, password};
use logipilot_core::AccountId;
use logipilot_infra::{AccountChanges, AccountStore, EntityKind, NewAccountRecord, Page, Store, StoreError};

use crate::error::ServiceError;
use crate::services::{ADMIN, Services};

impl<S: Store> Services<S> {
    pub async fn create_account(
        &self,
        actor: &Account,
        draft: AccountDraft,
    ) -> Result<Account, ServiceError> {
        authorize(actor, ADMIN)?;
        draft.validate()?;

        let record = NewAccountRecord {
            email: normalize_email(&draft.email),
            password_hash: password::hash(&draft.password)?,
            role: draft.role,
            active: draft.active,
        };

        Ok(self.store.insert_account(record).await?)
    }

    pub async fn account_by_id(
        &self,
        actor: &Account,
        id: AccountId,
    ) -> Result<Account, ServiceError> {
        authorize(actor, ADMIN)?;

        AccountStore::account_by_id(&self.store, id)
            .await?
            .ok_or_else(|| {
                StoreError::NotFound {
                    kind: EntityKind::Account,
                    id: id.as_i64(),
                }
                .into()
            })
    }

    pub async fn list_accounts(
        &self,
        actor: &Account,
        page: Page,
    ) -> Result<Vec<Account>, ServiceError> {
        authorize(actor, ADMIN)?;
        Ok(self.store.list_accounts(page).await?)
    }

    pub async fn update_account(
        &self,
        actor: &Account,
        id: AccountId,
        patch: AccountPatch,
    ) -> Result<Account, ServiceError> {
        authorize(actor, ADMIN)?;
        patch.validate()?;

        let changes = AccountChanges {
            email: patch.email.map(|e| normalize_email(&e)),
            password_hash: patch.password.map(|p| password::hash(&p)).transpose()?,
            role: patch.role,
            active: patch.active,
        };

        Ok(self.store.update_account(id, changes).await?)
    }

    /// Delete an account, except the one the caller is signed in as: an
    /// administrator locking themselves out by accident is not a supported
    /// operation.
    pub async fn delete_account(
        &self,
        actor: &Account,
        id: AccountId,
    ) -> Result<Account, ServiceError> {
        authorize(actor, ADMIN)?;

        if actor.id == id {
            return Err(ServiceError::SelfDeleteForbidden);
        }

        Ok(self.store.delete_account(id).await?)
    }
}
