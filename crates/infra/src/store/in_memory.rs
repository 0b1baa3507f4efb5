//! In-memory store.
//!
//! Intended for tests/dev. A single `RwLock` guards all four tables, so the
//! cascade procedures run entirely under one write lock: observers see
//! either every row of a cascade or none of them.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use logipilot_auth::{Account, AccountDirectory, DirectoryError};
use logipilot_core::{AccountId, AlertId, ClientId, ShipmentId};
use logipilot_logistics::{
    Alert, AlertDraft, Client, ClientDraft, ClientPatch, Shipment, ShipmentDraft, ShipmentPatch,
};

use super::r#trait::{
    AccountChanges, AccountStore, AlertChanges, AlertFilter, AlertStore, CascadeSummary,
    ClientFilter, ClientStore, EntityKind, NewAccountRecord, Page, ShipmentFilter, ShipmentStore,
    StoreError,
};

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<i64, Account>,
    clients: BTreeMap<i64, Client>,
    shipments: BTreeMap<i64, Shipment>,
    alerts: BTreeMap<i64, Alert>,
    last_account_id: i64,
    last_client_id: i64,
    last_shipment_id: i64,
    last_alert_id: i64,
}

impl Tables {
    fn client_exists(&self, id: ClientId) -> bool {
        self.clients.contains_key(&id.as_i64())
    }

    fn shipment_exists(&self, id: ShipmentId) -> bool {
        self.shipments.contains_key(&id.as_i64())
    }

    /// Cascade removal of a client: its shipments, their alerts, then the
    /// parent row. The caller holds the write lock, so the removal is
    /// observed all-or-nothing.
    fn cascade_delete_client(&mut self, id: ClientId) -> Option<CascadeSummary> {
        self.clients.remove(&id.as_i64())?;

        let shipment_ids: Vec<i64> = self
            .shipments
            .iter()
            .filter(|(_, s)| s.client_id == id)
            .map(|(k, _)| *k)
            .collect();

        let mut summary = CascadeSummary::default();
        for shipment_id in shipment_ids {
            self.shipments.remove(&shipment_id);
            summary.shipments += 1;
            summary.alerts += self.remove_alerts_of(ShipmentId::new(shipment_id));
        }

        Some(summary)
    }

    fn remove_alerts_of(&mut self, shipment_id: ShipmentId) -> u64 {
        let alert_ids: Vec<i64> = self
            .alerts
            .iter()
            .filter(|(_, a)| a.shipment_id == shipment_id)
            .map(|(k, _)| *k)
            .collect();

        let removed = alert_ids.len() as u64;
        for alert_id in alert_ids {
            self.alerts.remove(&alert_id);
        }
        removed
    }
}

/// In-memory storage backend.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .collect()
}

#[async_trait::async_trait]
impl AccountStore for InMemoryStore {
    async fn insert_account(&self, record: NewAccountRecord) -> Result<Account, StoreError> {
        let mut tables = self.write()?;

        if tables.accounts.values().any(|a| a.email == record.email) {
            return Err(StoreError::DuplicateEmail {
                kind: EntityKind::Account,
                email: record.email,
            });
        }

        tables.last_account_id += 1;
        let id = tables.last_account_id;
        let account = Account {
            id: AccountId::new(id),
            email: record.email,
            password_hash: record.password_hash,
            role: record.role,
            active: record.active,
        };
        tables.accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn account_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.read()?.accounts.get(&id.as_i64()).cloned())
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .read()?
            .accounts
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn list_accounts(&self, page: Page) -> Result<Vec<Account>, StoreError> {
        let accounts: Vec<Account> = self.read()?.accounts.values().cloned().collect();
        Ok(paginate(accounts, page))
    }

    async fn update_account(
        &self,
        id: AccountId,
        changes: AccountChanges,
    ) -> Result<Account, StoreError> {
        let mut tables = self.write()?;

        if !tables.accounts.contains_key(&id.as_i64()) {
            return Err(StoreError::NotFound {
                kind: EntityKind::Account,
                id: id.as_i64(),
            });
        }

        // Uniqueness is checked before anything mutates, so a collision
        // leaves the row untouched.
        if let Some(email) = &changes.email {
            if tables
                .accounts
                .values()
                .any(|a| a.email == *email && a.id != id)
            {
                return Err(StoreError::DuplicateEmail {
                    kind: EntityKind::Account,
                    email: email.clone(),
                });
            }
        }

        let account = tables
            .accounts
            .get_mut(&id.as_i64())
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Account,
                id: id.as_i64(),
            })?;

        if let Some(email) = changes.email {
            account.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            account.password_hash = password_hash;
        }
        if let Some(role) = changes.role {
            account.role = role;
        }
        if let Some(active) = changes.active {
            account.active = active;
        }

        Ok(account.clone())
    }

    async fn delete_account(&self, id: AccountId) -> Result<Account, StoreError> {
        self.write()?
            .accounts
            .remove(&id.as_i64())
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Account,
                id: id.as_i64(),
            })
    }
}

#[async_trait::async_trait]
impl ClientStore for InMemoryStore {
    async fn insert_client(
        &self,
        draft: ClientDraft,
        now: DateTime<Utc>,
    ) -> Result<Client, StoreError> {
        let mut tables = self.write()?;

        if tables.clients.values().any(|c| c.email == draft.email) {
            return Err(StoreError::DuplicateEmail {
                kind: EntityKind::Client,
                email: draft.email,
            });
        }

        tables.last_client_id += 1;
        let id = tables.last_client_id;
        let client = Client {
            id: ClientId::new(id),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            status: draft.status,
            created_at: now,
        };
        tables.clients.insert(id, client.clone());
        Ok(client)
    }

    async fn client_by_id(&self, id: ClientId) -> Result<Option<Client>, StoreError> {
        Ok(self.read()?.clients.get(&id.as_i64()).cloned())
    }

    async fn client_by_email(&self, email: &str) -> Result<Option<Client>, StoreError> {
        Ok(self
            .read()?
            .clients
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn list_clients(
        &self,
        filter: ClientFilter,
        page: Page,
    ) -> Result<Vec<Client>, StoreError> {
        let mut clients: Vec<Client> = self
            .read()?
            .clients
            .values()
            .filter(|c| filter.status.is_none_or(|s| c.status == s))
            .cloned()
            .collect();
        clients.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(paginate(clients, page))
    }

    async fn update_client(
        &self,
        id: ClientId,
        patch: ClientPatch,
    ) -> Result<Client, StoreError> {
        let mut tables = self.write()?;

        if !tables.clients.contains_key(&id.as_i64()) {
            return Err(StoreError::NotFound {
                kind: EntityKind::Client,
                id: id.as_i64(),
            });
        }

        if let Some(email) = &patch.email {
            if tables
                .clients
                .values()
                .any(|c| c.email == *email && c.id != id)
            {
                return Err(StoreError::DuplicateEmail {
                    kind: EntityKind::Client,
                    email: email.clone(),
                });
            }
        }

        let client = tables
            .clients
            .get_mut(&id.as_i64())
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Client,
                id: id.as_i64(),
            })?;

        if let Some(name) = patch.name {
            client.name = name;
        }
        if let Some(email) = patch.email {
            client.email = email;
        }
        if let Some(phone) = patch.phone {
            client.phone = Some(phone);
        }
        if let Some(status) = patch.status {
            client.status = status;
        }

        Ok(client.clone())
    }

    async fn delete_client(&self, id: ClientId) -> Result<CascadeSummary, StoreError> {
        self.write()?
            .cascade_delete_client(id)
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Client,
                id: id.as_i64(),
            })
    }
}

#[async_trait::async_trait]
impl ShipmentStore for InMemoryStore {
    async fn insert_shipment(
        &self,
        draft: ShipmentDraft,
        now: DateTime<Utc>,
    ) -> Result<Shipment, StoreError> {
        let mut tables = self.write()?;

        if !tables.client_exists(draft.client_id) {
            return Err(StoreError::ParentNotFound {
                kind: EntityKind::Client,
                id: draft.client_id.as_i64(),
            });
        }

        tables.last_shipment_id += 1;
        let id = tables.last_shipment_id;
        let shipment = Shipment {
            id: ShipmentId::new(id),
            client_id: draft.client_id,
            origin: draft.origin,
            destination: draft.destination,
            status: draft.status,
            created_at: now,
        };
        tables.shipments.insert(id, shipment.clone());
        Ok(shipment)
    }

    async fn shipment_by_id(&self, id: ShipmentId) -> Result<Option<Shipment>, StoreError> {
        Ok(self.read()?.shipments.get(&id.as_i64()).cloned())
    }

    async fn list_shipments(
        &self,
        filter: ShipmentFilter,
        page: Page,
    ) -> Result<Vec<Shipment>, StoreError> {
        let mut shipments: Vec<Shipment> = self
            .read()?
            .shipments
            .values()
            .filter(|s| filter.client_id.is_none_or(|c| s.client_id == c))
            .filter(|s| filter.status.is_none_or(|st| s.status == st))
            .cloned()
            .collect();
        shipments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(shipments, page))
    }

    async fn update_shipment(
        &self,
        id: ShipmentId,
        patch: ShipmentPatch,
    ) -> Result<Shipment, StoreError> {
        let mut tables = self.write()?;

        if !tables.shipments.contains_key(&id.as_i64()) {
            return Err(StoreError::NotFound {
                kind: EntityKind::Shipment,
                id: id.as_i64(),
            });
        }

        // Parent existence is checked before anything mutates: a failed
        // reassignment leaves the prior state untouched.
        if let Some(client_id) = patch.client_id {
            if !tables.client_exists(client_id) {
                return Err(StoreError::ParentNotFound {
                    kind: EntityKind::Client,
                    id: client_id.as_i64(),
                });
            }
        }

        let shipment = tables
            .shipments
            .get_mut(&id.as_i64())
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Shipment,
                id: id.as_i64(),
            })?;

        if let Some(client_id) = patch.client_id {
            shipment.client_id = client_id;
        }
        if let Some(origin) = patch.origin {
            shipment.origin = origin;
        }
        if let Some(destination) = patch.destination {
            shipment.destination = destination;
        }
        if let Some(status) = patch.status {
            shipment.status = status;
        }

        Ok(shipment.clone())
    }

    async fn delete_shipment(&self, id: ShipmentId) -> Result<u64, StoreError> {
        let mut tables = self.write()?;

        if tables.shipments.remove(&id.as_i64()).is_none() {
            return Err(StoreError::NotFound {
                kind: EntityKind::Shipment,
                id: id.as_i64(),
            });
        }

        Ok(tables.remove_alerts_of(id))
    }
}

#[async_trait::async_trait]
impl AlertStore for InMemoryStore {
    async fn insert_alert(
        &self,
        draft: AlertDraft,
        now: DateTime<Utc>,
    ) -> Result<Alert, StoreError> {
        let mut tables = self.write()?;

        if !tables.shipment_exists(draft.shipment_id) {
            return Err(StoreError::ParentNotFound {
                kind: EntityKind::Shipment,
                id: draft.shipment_id.as_i64(),
            });
        }

        tables.last_alert_id += 1;
        let id = tables.last_alert_id;
        let alert = Alert {
            id: AlertId::new(id),
            shipment_id: draft.shipment_id,
            message: draft.message,
            severity: draft.severity,
            created_at: now,
        };
        tables.alerts.insert(id, alert.clone());
        Ok(alert)
    }

    async fn alert_by_id(&self, id: AlertId) -> Result<Option<Alert>, StoreError> {
        Ok(self.read()?.alerts.get(&id.as_i64()).cloned())
    }

    async fn list_alerts(
        &self,
        filter: AlertFilter,
        page: Page,
    ) -> Result<Vec<Alert>, StoreError> {
        let mut alerts: Vec<Alert> = self
            .read()?
            .alerts
            .values()
            .filter(|a| filter.shipment_id.is_none_or(|s| a.shipment_id == s))
            .filter(|a| filter.severity.is_none_or(|sev| a.severity == sev))
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(alerts, page))
    }

    async fn update_alert(
        &self,
        id: AlertId,
        changes: AlertChanges,
    ) -> Result<Alert, StoreError> {
        let mut tables = self.write()?;

        let alert = tables
            .alerts
            .get_mut(&id.as_i64())
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Alert,
                id: id.as_i64(),
            })?;

        if let Some(message) = changes.message {
            alert.message = message;
        }
        if let Some(severity) = changes.severity {
            alert.severity = severity;
        }

        Ok(alert.clone())
    }

    async fn delete_alert(&self, id: AlertId) -> Result<Alert, StoreError> {
        self.write()?
            .alerts
            .remove(&id.as_i64())
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Alert,
                id: id.as_i64(),
            })
    }
}

#[async_trait::async_trait]
impl AccountDirectory for InMemoryStore {
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, DirectoryError> {
        AccountStore::account_by_id(self, id)
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DirectoryError> {
        AccountStore::account_by_email(self, email)
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))
    }
}
