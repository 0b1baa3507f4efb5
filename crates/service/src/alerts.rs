//! Alert operations.

use chrono::Utc;

use logipilot_auth::{Account, authorize};
use logipilot_core::AlertId;
use logipilot_infra::{
    AlertChanges, AlertFilter, AlertStore, EntityKind, Page, Store, StoreError,
};
use logipilot_logistics::{Alert, AlertDraft, AlertPatch};

use crate::error::ServiceError;
use crate::services::{ADMIN, ADMIN_OR_MANAGER, ANY_ROLE, Services};

impl<S: Store> Services<S> {
    /// Create an alert. The referenced shipment must exist; a miss is
    /// `ParentNotFound` and persists nothing.
    pub async fn create_alert(
        &self,
        actor: &Account,
        draft: AlertDraft,
    ) -> Result<Alert, ServiceError> {
        authorize(actor, ADMIN_OR_MANAGER)?;
        draft.validate()?;
        Ok(self.store.insert_alert(draft, Utc::now()).await?)
    }

    pub async fn alert_by_id(&self, actor: &Account, id: AlertId) -> Result<Alert, ServiceError> {
        authorize(actor, ANY_ROLE)?;

        AlertStore::alert_by_id(&self.store, id)
            .await?
            .ok_or_else(|| {
                StoreError::NotFound {
                    kind: EntityKind::Alert,
                    id: id.as_i64(),
                }
                .into()
            })
    }

    pub async fn list_alerts(
        &self,
        actor: &Account,
        filter: AlertFilter,
        page: Page,
    ) -> Result<Vec<Alert>, ServiceError> {
        authorize(actor, ANY_ROLE)?;
        Ok(self.store.list_alerts(filter, page).await?)
    }

    /// Update an alert's message and/or severity.
    ///
    /// Any attempt to move the alert to another shipment is rejected before
    /// the store is touched; the reference is immutable once set.
    pub async fn update_alert(
        &self,
        actor: &Account,
        id: AlertId,
        patch: AlertPatch,
    ) -> Result<Alert, ServiceError> {
        authorize(actor, ADMIN_OR_MANAGER)?;
        patch.validate()?;

        let changes = AlertChanges {
            message: patch.message,
            severity: patch.severity,
        };

        Ok(self.store.update_alert(id, changes).await?)
    }

    pub async fn delete_alert(&self, actor: &Account, id: AlertId) -> Result<Alert, ServiceError> {
        authorize(actor, ADMIN)?;
        Ok(self.store.delete_alert(id).await?)
    }
}
