pub mod in_memory;
pub mod postgres;
mod r#trait;

pub use in_memory::InMemoryStore;
pub use postgres::PgStore;
pub use r#trait::{
    AccountChanges, AccountStore, AlertChanges, AlertFilter, AlertStore, CascadeSummary,
    ClientFilter, ClientStore, EntityKind, NewAccountRecord, Page, ShipmentFilter, ShipmentStore,
    Store, StoreError,
};
