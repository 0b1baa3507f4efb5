//! Client operations.

use chrono::Utc;

use logipilot_auth::{Account, authorize};
use logipilot_core::ClientId;
use logipilot_infra::{
    CascadeSummary, ClientFilter, ClientStore, EntityKind, Page, Store, StoreError,
};
use logipilot_logistics::{Client, ClientDraft, ClientPatch};

use crate::error::ServiceError;
use crate::services::{ADMIN, ADMIN_OR_MANAGER, ANY_ROLE, Services};

impl<S: Store> Services<S> {
    pub async fn create_client(
        &self,
        actor: &Account,
        draft: ClientDraft,
    ) -> Result<Client, ServiceError> {
        authorize(actor, ADMIN_OR_MANAGER)?;
        draft.validate()?;
        Ok(self.store.insert_client(draft, Utc::now()).await?)
    }

    pub async fn client_by_id(
        &self,
        actor: &Account,
        id: ClientId,
    ) -> Result<Client, ServiceError> {
        authorize(actor, ANY_ROLE)?;

        ClientStore::client_by_id(&self.store, id)
            .await?
            .ok_or_else(|| {
                StoreError::NotFound {
                    kind: EntityKind::Client,
                    id: id.as_i64(),
                }
                .into()
            })
    }

    pub async fn list_clients(
        &self,
        actor: &Account,
        filter: ClientFilter,
        page: Page,
    ) -> Result<Vec<Client>, ServiceError> {
        authorize(actor, ANY_ROLE)?;
        Ok(self.store.list_clients(filter, page).await?)
    }

    pub async fn update_client(
        &self,
        actor: &Account,
        id: ClientId,
        patch: ClientPatch,
    ) -> Result<Client, ServiceError> {
        authorize(actor, ADMIN_OR_MANAGER)?;
        patch.validate()?;
        Ok(self.store.update_client(id, patch).await?)
    }

    /// Delete a client and everything it owns, atomically.
    pub async fn delete_client(
        &self,
        actor: &Account,
        id: ClientId,
    ) -> Result<CascadeSummary, ServiceError> {
        authorize(actor, ADMIN)?;

        let summary = self.store.delete_client(id).await?;
        tracing::info!(
            client_id = id.as_i64(),
            shipments = summary.shipments,
            alerts = summary.alerts,
            "client deleted with cascade"
        );
        Ok(summary)
    }
}
