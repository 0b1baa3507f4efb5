//! `logipilot-infra` — storage backends for the logistics service.
//!
//! Defines the store contracts plus two implementations: an in-memory store
//! (tests/dev and the reference semantics) and a Postgres store. The
//! referential-integrity checks and the cascade procedures live here, next
//! to the transactional boundaries that make them atomic.

pub mod store;

pub use store::{
    AccountChanges, AccountStore, AlertChanges, AlertFilter, AlertStore, CascadeSummary,
    ClientFilter, ClientStore, EntityKind, InMemoryStore, NewAccountRecord, Page, PgStore,
    ShipmentFilter, ShipmentStore, Store, StoreError,
};
