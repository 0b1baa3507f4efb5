//! Storage contracts for the four entity tables.
//!
//! Every backend must honor the same durable contract: surrogate integer
//! keys, unique emails on accounts and clients, required foreign keys on
//! shipments and alerts, and cascade deletes executed as one atomic unit.

use chrono::{DateTime, Utc};
use thiserror::Error;

use logipilot_auth::{Account, Role};
use logipilot_core::{AccountId, AlertId, ClientId, ShipmentId};
use logipilot_logistics::{
    Alert, AlertDraft, AlertSeverity, Client, ClientDraft, ClientPatch, ClientStatus, Shipment,
    ShipmentDraft, ShipmentPatch, ShipmentStatus,
};

/// Entity tables, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    Client,
    Shipment,
    Alert,
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            EntityKind::Account => "account",
            EntityKind::Client => "client",
            EntityKind::Shipment => "shipment",
            EntityKind::Alert => "alert",
        };
        f.write_str(name)
    }
}

/// Storage failure.
///
/// The first three variants are expected, caller-recoverable conditions and
/// safe to surface (a missing parent names its kind and id on purpose).
/// `Unavailable` is the unclassified infrastructure kind; its detail must
/// never reach external callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    /// A dependent row referenced a parent that does not exist.
    #[error("{kind} {id} not found")]
    ParentNotFound { kind: EntityKind, id: i64 },

    /// Unique-key collision on an email column.
    #[error("{kind} with email '{email}' already exists")]
    DuplicateEmail { kind: EntityKind, email: String },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Offset/limit paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 100,
        }
    }
}

/// Client listing filter (results ordered by name).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientFilter {
    pub status: Option<ClientStatus>,
}

/// Shipment listing filter (results newest-first).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShipmentFilter {
    pub client_id: Option<ClientId>,
    pub status: Option<ShipmentStatus>,
}

/// Alert listing filter (results newest-first).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertFilter {
    pub shipment_id: Option<ShipmentId>,
    pub severity: Option<AlertSeverity>,
}

/// A new account row, credential already hashed and email already
/// normalized by the caller.
#[derive(Debug, Clone)]
pub struct NewAccountRecord {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
}

/// Column-level account update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

/// Column-level alert update.
///
/// Deliberately has no shipment field: the storage layer offers no way to
/// move an alert to another shipment.
#[derive(Debug, Clone, Default)]
pub struct AlertChanges {
    pub message: Option<String>,
    pub severity: Option<AlertSeverity>,
}

/// What a cascade delete removed, for reporting and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    pub shipments: u64,
    pub alerts: u64,
}

#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account; the email must be unique.
    async fn insert_account(&self, record: NewAccountRecord) -> Result<Account, StoreError>;

    async fn account_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Accounts ordered by id.
    async fn list_accounts(&self, page: Page) -> Result<Vec<Account>, StoreError>;

    /// Apply column changes; email uniqueness is re-checked when the email
    /// changes, and a failed check leaves the row untouched.
    async fn update_account(
        &self,
        id: AccountId,
        changes: AccountChanges,
    ) -> Result<Account, StoreError>;

    /// Delete and return the account. A missing id is `NotFound`.
    async fn delete_account(&self, id: AccountId) -> Result<Account, StoreError>;
}

#[async_trait::async_trait]
pub trait ClientStore: Send + Sync {
    /// Insert a new client; the email must be unique.
    async fn insert_client(
        &self,
        draft: ClientDraft,
        now: DateTime<Utc>,
    ) -> Result<Client, StoreError>;

    async fn client_by_id(&self, id: ClientId) -> Result<Option<Client>, StoreError>;

    async fn client_by_email(&self, email: &str) -> Result<Option<Client>, StoreError>;

    async fn list_clients(
        &self,
        filter: ClientFilter,
        page: Page,
    ) -> Result<Vec<Client>, StoreError>;

    async fn update_client(&self, id: ClientId, patch: ClientPatch)
        -> Result<Client, StoreError>;

    /// Remove the client, its shipments, and their alerts as one atomic
    /// unit; no orphan may remain observable afterwards.
    async fn delete_client(&self, id: ClientId) -> Result<CascadeSummary, StoreError>;
}

#[async_trait::async_trait]
pub trait ShipmentStore: Send + Sync {
    /// Insert a new shipment. A missing client is `ParentNotFound` and
    /// persists nothing.
    async fn insert_shipment(
        &self,
        draft: ShipmentDraft,
        now: DateTime<Utc>,
    ) -> Result<Shipment, StoreError>;

    async fn shipment_by_id(&self, id: ShipmentId) -> Result<Option<Shipment>, StoreError>;

    async fn list_shipments(
        &self,
        filter: ShipmentFilter,
        page: Page,
    ) -> Result<Vec<Shipment>, StoreError>;

    /// Apply the patch. Reassigning `client_id` re-runs the parent existence
    /// check first; on failure the prior state is left untouched.
    async fn update_shipment(
        &self,
        id: ShipmentId,
        patch: ShipmentPatch,
    ) -> Result<Shipment, StoreError>;

    /// Remove the shipment and its alerts atomically; returns how many
    /// alerts went with it.
    async fn delete_shipment(&self, id: ShipmentId) -> Result<u64, StoreError>;
}

#[async_trait::async_trait]
pub trait AlertStore: Send + Sync {
    /// Insert a new alert. A missing shipment is `ParentNotFound` and
    /// persists nothing.
    async fn insert_alert(
        &self,
        draft: AlertDraft,
        now: DateTime<Utc>,
    ) -> Result<Alert, StoreError>;

    async fn alert_by_id(&self, id: AlertId) -> Result<Option<Alert>, StoreError>;

    async fn list_alerts(&self, filter: AlertFilter, page: Page)
        -> Result<Vec<Alert>, StoreError>;

    async fn update_alert(&self, id: AlertId, changes: AlertChanges)
        -> Result<Alert, StoreError>;

    async fn delete_alert(&self, id: AlertId) -> Result<Alert, StoreError>;
}

/// Umbrella trait for a full storage backend.
///
/// Backends also implement [`logipilot_auth::AccountDirectory`] so the
/// authorization gate can re-resolve accounts through the same source of
/// truth.
pub trait Store:
    AccountStore + ClientStore + ShipmentStore + AlertStore + logipilot_auth::AccountDirectory
{
}

impl<T> Store for T where
    T: AccountStore + ClientStore + ShipmentStore + AlertStore + logipilot_auth::AccountDirectory
{
}
