//! Logistics domain module (clients, shipments, alerts).
//!
//! Pure domain types and field validation (no IO, no HTTP, no storage).
//! Ownership runs strictly downward: a client owns its shipments and a
//! shipment owns its alerts; nothing is shared across two owners.

pub mod alert;
pub mod client;
pub mod shipment;

pub use alert::{Alert, AlertDraft, AlertPatch, AlertSeverity};
pub use client::{Client, ClientDraft, ClientPatch, ClientStatus};
pub use shipment::{Shipment, ShipmentDraft, ShipmentPatch, ShipmentStatus};
