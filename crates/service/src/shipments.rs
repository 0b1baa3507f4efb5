//! Shipment operations.

use chrono::Utc;

use logipilot_auth::{Account, authorize};
use logipilot_core::ShipmentId;
use logipilot_infra::{EntityKind, Page, ShipmentFilter, ShipmentStore, Store, StoreError};
use logipilot_logistics::{Shipment, ShipmentDraft, ShipmentPatch};

use crate::error::ServiceError;
use crate::services::{ADMIN, ADMIN_OR_MANAGER, ANY_ROLE, Services};

impl<S: Store> Services<S> {
    /// Create a shipment. The referenced client must exist; a miss is
    /// `ParentNotFound` and persists nothing.
    pub async fn create_shipment(
        &self,
        actor: &Account,
        draft: ShipmentDraft,
    ) -> Result<Shipment, ServiceError> {
        authorize(actor, ADMIN_OR_MANAGER)?;
        draft.validate()?;
        Ok(self.store.insert_shipment(draft, Utc::now()).await?)
    }

    pub async fn shipment_by_id(
        &self,
        actor: &Account,
        id: ShipmentId,
    ) -> Result<Shipment, ServiceError> {
        authorize(actor, ANY_ROLE)?;

        ShipmentStore::shipment_by_id(&self.store, id)
            .await?
            .ok_or_else(|| {
                StoreError::NotFound {
                    kind: EntityKind::Shipment,
                    id: id.as_i64(),
                }
                .into()
            })
    }

    pub async fn list_shipments(
        &self,
        actor: &Account,
        filter: ShipmentFilter,
        page: Page,
    ) -> Result<Vec<Shipment>, ServiceError> {
        authorize(actor, ANY_ROLE)?;
        Ok(self.store.list_shipments(filter, page).await?)
    }

    /// Update a shipment. Reassigning it to another client re-runs the
    /// existence check; on failure the shipment is left untouched.
    pub async fn update_shipment(
        &self,
        actor: &Account,
        id: ShipmentId,
        patch: ShipmentPatch,
    ) -> Result<Shipment, ServiceError> {
        authorize(actor, ADMIN_OR_MANAGER)?;
        patch.validate()?;
        Ok(self.store.update_shipment(id, patch).await?)
    }

    /// Delete a shipment and its alerts atomically; returns the number of
    /// alerts removed.
    pub async fn delete_shipment(
        &self,
        actor: &Account,
        id: ShipmentId,
    ) -> Result<u64, ServiceError> {
        authorize(actor, ADMIN)?;
        Ok(self.store.delete_shipment(id).await?)
    }
}
