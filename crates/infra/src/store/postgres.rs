//! Postgres-backed store.
//!
//! Enums travel as text through one exhaustive conversion per type; the
//! integrity checks and cascade deletes run inside explicit transactions so
//! their atomicity does not depend on schema-level FK actions.
//!
//! ## Error mapping
//!
//! | SQLx error | PostgreSQL code | StoreError |
//! |------------|-----------------|------------|
//! | Database (unique violation) | `23505` | `DuplicateEmail` |
//! | anything else | any | `Unavailable` |

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;

use logipilot_auth::{Account, AccountDirectory, DirectoryError, Role};
use logipilot_core::{AccountId, AlertId, ClientId, ShipmentId};
use logipilot_logistics::{
    Alert, AlertDraft, AlertSeverity, Client, ClientDraft, ClientPatch, ClientStatus, Shipment,
    ShipmentDraft, ShipmentPatch, ShipmentStatus,
};

use super::r#trait::{
    AccountChanges, AccountStore, AlertChanges, AlertFilter, AlertStore, CascadeSummary,
    ClientFilter, ClientStore, EntityKind, NewAccountRecord, Page, ShipmentFilter, ShipmentStore,
    StoreError,
};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id BIGSERIAL PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL,
        active BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS clients (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        phone TEXT,
        status TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS shipments (
        id BIGSERIAL PRIMARY KEY,
        client_id BIGINT NOT NULL REFERENCES clients(id),
        origin TEXT NOT NULL,
        destination TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS alerts (
        id BIGSERIAL PRIMARY KEY,
        shipment_id BIGINT NOT NULL REFERENCES shipments(id),
        message TEXT NOT NULL,
        severity TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
];

/// Create the four entity tables if absent. Bootstrap convenience only;
/// schema evolution is the deployment's concern.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    }
    Ok(())
}

/// Postgres storage backend.
///
/// Holds a connection pool; each operation acquires a connection (or a
/// transaction) for its own scope and releases it deterministically.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx_error(op: &str, e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(format!("{op}: {e}"))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

fn corrupt_row(kind: EntityKind, detail: impl core::fmt::Display) -> StoreError {
    StoreError::Unavailable(format!("corrupt {kind} row: {detail}"))
}

// SQLx row types

#[derive(Debug)]
struct AccountRow {
    id: i64,
    email: String,
    password_hash: String,
    role: String,
    active: bool,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for AccountRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(AccountRow {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role: row.try_get("role")?,
            active: row.try_get("active")?,
        })
    }
}

impl AccountRow {
    fn into_account(self) -> Result<Account, StoreError> {
        let role = self
            .role
            .parse::<Role>()
            .map_err(|e| corrupt_row(EntityKind::Account, e))?;
        Ok(Account {
            id: AccountId::new(self.id),
            email: self.email,
            password_hash: self.password_hash,
            role,
            active: self.active,
        })
    }
}

#[derive(Debug)]
struct ClientRow {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ClientRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ClientRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl ClientRow {
    fn into_client(self) -> Result<Client, StoreError> {
        let status = self
            .status
            .parse::<ClientStatus>()
            .map_err(|e| corrupt_row(EntityKind::Client, e))?;
        Ok(Client {
            id: ClientId::new(self.id),
            name: self.name,
            email: self.email,
            phone: self.phone,
            status,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug)]
struct ShipmentRow {
    id: i64,
    client_id: i64,
    origin: String,
    destination: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ShipmentRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ShipmentRow {
            id: row.try_get("id")?,
            client_id: row.try_get("client_id")?,
            origin: row.try_get("origin")?,
            destination: row.try_get("destination")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl ShipmentRow {
    fn into_shipment(self) -> Result<Shipment, StoreError> {
        let status = self
            .status
            .parse::<ShipmentStatus>()
            .map_err(|e| corrupt_row(EntityKind::Shipment, e))?;
        Ok(Shipment {
            id: ShipmentId::new(self.id),
            client_id: ClientId::new(self.client_id),
            origin: self.origin,
            destination: self.destination,
            status,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug)]
struct AlertRow {
    id: i64,
    shipment_id: i64,
    message: String,
    severity: String,
    created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for AlertRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(AlertRow {
            id: row.try_get("id")?,
            shipment_id: row.try_get("shipment_id")?,
            message: row.try_get("message")?,
            severity: row.try_get("severity")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl AlertRow {
    fn into_alert(self) -> Result<Alert, StoreError> {
        let severity = self
            .severity
            .parse::<AlertSeverity>()
            .map_err(|e| corrupt_row(EntityKind::Alert, e))?;
        Ok(Alert {
            id: AlertId::new(self.id),
            shipment_id: ShipmentId::new(self.shipment_id),
            message: self.message,
            severity,
            created_at: self.created_at,
        })
    }
}

#[async_trait::async_trait]
impl AccountStore for PgStore {
    async fn insert_account(&self, record: NewAccountRecord) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (email, password_hash, role, active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, role, active
            "#,
        )
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(record.role.as_str())
        .bind(record.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateEmail {
                    kind: EntityKind::Account,
                    email: record.email.clone(),
                }
            } else {
                map_sqlx_error("insert_account", e)
            }
        })?;

        row.into_account()
    }

    async fn account_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        sqlx::query_as::<_, AccountRow>(
            "SELECT id, email, password_hash, role, active FROM accounts WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("account_by_id", e))?
        .map(AccountRow::into_account)
        .transpose()
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        sqlx::query_as::<_, AccountRow>(
            "SELECT id, email, password_hash, role, active FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("account_by_email", e))?
        .map(AccountRow::into_account)
        .transpose()
    }

    async fn list_accounts(&self, page: Page) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, role, active
            FROM accounts
            ORDER BY id ASC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_accounts", e))?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }

    async fn update_account(
        &self,
        id: AccountId,
        changes: AccountChanges,
    ) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts SET
                email = COALESCE($2, email),
                password_hash = COALESCE($3, password_hash),
                role = COALESCE($4, role),
                active = COALESCE($5, active)
            WHERE id = $1
            RETURNING id, email, password_hash, role, active
            "#,
        )
        .bind(id.as_i64())
        .bind(changes.email.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.role.map(|r| r.as_str()))
        .bind(changes.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateEmail {
                    kind: EntityKind::Account,
                    email: changes.email.clone().unwrap_or_default(),
                }
            } else {
                map_sqlx_error("update_account", e)
            }
        })?
        .ok_or(StoreError::NotFound {
            kind: EntityKind::Account,
            id: id.as_i64(),
        })?;

        row.into_account()
    }

    async fn delete_account(&self, id: AccountId) -> Result<Account, StoreError> {
        sqlx::query_as::<_, AccountRow>(
            "DELETE FROM accounts WHERE id = $1 RETURNING id, email, password_hash, role, active",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_account", e))?
        .ok_or(StoreError::NotFound {
            kind: EntityKind::Account,
            id: id.as_i64(),
        })?
        .into_account()
    }
}

#[async_trait::async_trait]
impl ClientStore for PgStore {
    async fn insert_client(
        &self,
        draft: ClientDraft,
        now: DateTime<Utc>,
    ) -> Result<Client, StoreError> {
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            INSERT INTO clients (name, email, phone, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, phone, status, created_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(draft.phone.as_deref())
        .bind(draft.status.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateEmail {
                    kind: EntityKind::Client,
                    email: draft.email.clone(),
                }
            } else {
                map_sqlx_error("insert_client", e)
            }
        })?;

        row.into_client()
    }

    async fn client_by_id(&self, id: ClientId) -> Result<Option<Client>, StoreError> {
        sqlx::query_as::<_, ClientRow>(
            "SELECT id, name, email, phone, status, created_at FROM clients WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("client_by_id", e))?
        .map(ClientRow::into_client)
        .transpose()
    }

    async fn client_by_email(&self, email: &str) -> Result<Option<Client>, StoreError> {
        sqlx::query_as::<_, ClientRow>(
            "SELECT id, name, email, phone, status, created_at FROM clients WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("client_by_email", e))?
        .map(ClientRow::into_client)
        .transpose()
    }

    async fn list_clients(
        &self,
        filter: ClientFilter,
        page: Page,
    ) -> Result<Vec<Client>, StoreError> {
        let rows = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, name, email, phone, status, created_at
            FROM clients
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY name ASC, id ASC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(filter.status.map(|s| s.as_str()))
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_clients", e))?;

        rows.into_iter().map(ClientRow::into_client).collect()
    }

    async fn update_client(
        &self,
        id: ClientId,
        patch: ClientPatch,
    ) -> Result<Client, StoreError> {
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            UPDATE clients SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                status = COALESCE($5, status)
            WHERE id = $1
            RETURNING id, name, email, phone, status, created_at
            "#,
        )
        .bind(id.as_i64())
        .bind(patch.name.as_deref())
        .bind(patch.email.as_deref())
        .bind(patch.phone.as_deref())
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateEmail {
                    kind: EntityKind::Client,
                    email: patch.email.clone().unwrap_or_default(),
                }
            } else {
                map_sqlx_error("update_client", e)
            }
        })?
        .ok_or(StoreError::NotFound {
            kind: EntityKind::Client,
            id: id.as_i64(),
        })?;

        row.into_client()
    }

    #[instrument(skip(self), fields(client_id = id.as_i64()), err)]
    async fn delete_client(&self, id: ClientId) -> Result<CascadeSummary, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("delete_client", e))?;

        // Children first: alerts, then shipments, then the parent row. One
        // transaction, so a missing parent rolls the child deletes back.
        let alerts = sqlx::query(
            r#"
            DELETE FROM alerts
            WHERE shipment_id IN (SELECT id FROM shipments WHERE client_id = $1)
            "#,
        )
        .bind(id.as_i64())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("delete_client", e))?
        .rows_affected();

        let shipments = sqlx::query("DELETE FROM shipments WHERE client_id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_client", e))?
            .rows_affected();

        let removed = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_client", e))?
            .rows_affected();

        if removed == 0 {
            return Err(StoreError::NotFound {
                kind: EntityKind::Client,
                id: id.as_i64(),
            });
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("delete_client", e))?;

        Ok(CascadeSummary { shipments, alerts })
    }
}

#[async_trait::async_trait]
impl ShipmentStore for PgStore {
    #[instrument(skip(self, draft), fields(client_id = draft.client_id.as_i64()), err)]
    async fn insert_shipment(
        &self,
        draft: ShipmentDraft,
        now: DateTime<Utc>,
    ) -> Result<Shipment, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("insert_shipment", e))?;

        let parent_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM clients WHERE id = $1)")
                .bind(draft.client_id.as_i64())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("insert_shipment", e))?;

        if !parent_exists {
            return Err(StoreError::ParentNotFound {
                kind: EntityKind::Client,
                id: draft.client_id.as_i64(),
            });
        }

        let row = sqlx::query_as::<_, ShipmentRow>(
            r#"
            INSERT INTO shipments (client_id, origin, destination, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, client_id, origin, destination, status, created_at
            "#,
        )
        .bind(draft.client_id.as_i64())
        .bind(&draft.origin)
        .bind(&draft.destination)
        .bind(draft.status.as_str())
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_shipment", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("insert_shipment", e))?;

        row.into_shipment()
    }

    async fn shipment_by_id(&self, id: ShipmentId) -> Result<Option<Shipment>, StoreError> {
        sqlx::query_as::<_, ShipmentRow>(
            r#"
            SELECT id, client_id, origin, destination, status, created_at
            FROM shipments
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("shipment_by_id", e))?
        .map(ShipmentRow::into_shipment)
        .transpose()
    }

    async fn list_shipments(
        &self,
        filter: ShipmentFilter,
        page: Page,
    ) -> Result<Vec<Shipment>, StoreError> {
        let rows = sqlx::query_as::<_, ShipmentRow>(
            r#"
            SELECT id, client_id, origin, destination, status, created_at
            FROM shipments
            WHERE ($1::BIGINT IS NULL OR client_id = $1)
              AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY created_at DESC, id DESC
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(filter.client_id.map(|c| c.as_i64()))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_shipments", e))?;

        rows.into_iter().map(ShipmentRow::into_shipment).collect()
    }

    async fn update_shipment(
        &self,
        id: ShipmentId,
        patch: ShipmentPatch,
    ) -> Result<Shipment, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("update_shipment", e))?;

        // Reassignment re-runs the parent check in the same transaction as
        // the write: a missing client aborts with nothing persisted.
        if let Some(client_id) = patch.client_id {
            let parent_exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM clients WHERE id = $1)")
                    .bind(client_id.as_i64())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| map_sqlx_error("update_shipment", e))?;

            if !parent_exists {
                return Err(StoreError::ParentNotFound {
                    kind: EntityKind::Client,
                    id: client_id.as_i64(),
                });
            }
        }

        let row = sqlx::query_as::<_, ShipmentRow>(
            r#"
            UPDATE shipments SET
                client_id = COALESCE($2, client_id),
                origin = COALESCE($3, origin),
                destination = COALESCE($4, destination),
                status = COALESCE($5, status)
            WHERE id = $1
            RETURNING id, client_id, origin, destination, status, created_at
            "#,
        )
        .bind(id.as_i64())
        .bind(patch.client_id.map(|c| c.as_i64()))
        .bind(patch.origin.as_deref())
        .bind(patch.destination.as_deref())
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_shipment", e))?
        .ok_or(StoreError::NotFound {
            kind: EntityKind::Shipment,
            id: id.as_i64(),
        })?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("update_shipment", e))?;

        row.into_shipment()
    }

    async fn delete_shipment(&self, id: ShipmentId) -> Result<u64, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("delete_shipment", e))?;

        let alerts = sqlx::query("DELETE FROM alerts WHERE shipment_id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_shipment", e))?
            .rows_affected();

        let removed = sqlx::query("DELETE FROM shipments WHERE id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_shipment", e))?
            .rows_affected();

        if removed == 0 {
            return Err(StoreError::NotFound {
                kind: EntityKind::Shipment,
                id: id.as_i64(),
            });
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("delete_shipment", e))?;

        Ok(alerts)
    }
}

#[async_trait::async_trait]
impl AlertStore for PgStore {
    async fn insert_alert(
        &self,
        draft: AlertDraft,
        now: DateTime<Utc>,
    ) -> Result<Alert, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("insert_alert", e))?;

        let parent_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM shipments WHERE id = $1)")
                .bind(draft.shipment_id.as_i64())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("insert_alert", e))?;

        if !parent_exists {
            return Err(StoreError::ParentNotFound {
                kind: EntityKind::Shipment,
                id: draft.shipment_id.as_i64(),
            });
        }

        let row = sqlx::query_as::<_, AlertRow>(
            r#"
            INSERT INTO alerts (shipment_id, message, severity, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, shipment_id, message, severity, created_at
            "#,
        )
        .bind(draft.shipment_id.as_i64())
        .bind(&draft.message)
        .bind(draft.severity.as_str())
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_alert", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("insert_alert", e))?;

        row.into_alert()
    }

    async fn alert_by_id(&self, id: AlertId) -> Result<Option<Alert>, StoreError> {
        sqlx::query_as::<_, AlertRow>(
            "SELECT id, shipment_id, message, severity, created_at FROM alerts WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("alert_by_id", e))?
        .map(AlertRow::into_alert)
        .transpose()
    }

    async fn list_alerts(
        &self,
        filter: AlertFilter,
        page: Page,
    ) -> Result<Vec<Alert>, StoreError> {
        let rows = sqlx::query_as::<_, AlertRow>(
            r#"
            SELECT id, shipment_id, message, severity, created_at
            FROM alerts
            WHERE ($1::BIGINT IS NULL OR shipment_id = $1)
              AND ($2::TEXT IS NULL OR severity = $2)
            ORDER BY created_at DESC, id DESC
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(filter.shipment_id.map(|s| s.as_i64()))
        .bind(filter.severity.map(|s| s.as_str()))
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_alerts", e))?;

        rows.into_iter().map(AlertRow::into_alert).collect()
    }

    async fn update_alert(
        &self,
        id: AlertId,
        changes: AlertChanges,
    ) -> Result<Alert, StoreError> {
        sqlx::query_as::<_, AlertRow>(
            r#"
            UPDATE alerts SET
                message = COALESCE($2, message),
                severity = COALESCE($3, severity)
            WHERE id = $1
            RETURNING id, shipment_id, message, severity, created_at
            "#,
        )
        .bind(id.as_i64())
        .bind(changes.message.as_deref())
        .bind(changes.severity.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_alert", e))?
        .ok_or(StoreError::NotFound {
            kind: EntityKind::Alert,
            id: id.as_i64(),
        })?
        .into_alert()
    }

    async fn delete_alert(&self, id: AlertId) -> Result<Alert, StoreError> {
        sqlx::query_as::<_, AlertRow>(
            r#"
            DELETE FROM alerts
            WHERE id = $1
            RETURNING id, shipment_id, message, severity, created_at
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_alert", e))?
        .ok_or(StoreError::NotFound {
            kind: EntityKind::Alert,
            id: id.as_i64(),
        })?
        .into_alert()
    }
}

#[async_trait::async_trait]
impl AccountDirectory for PgStore {
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
