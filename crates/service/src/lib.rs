//! `logipilot-service` — the gated operation layer.
//!
//! Composes the authorization gate with a storage backend: every operation
//! takes the resolved caller and authorizes before touching entity state.
//! An HTTP transport embeds this crate; nothing here knows about routing or
//! wire formats. The folder is structured like:
//! - `services.rs`: the facade struct and per-operation role requirements
//! - `session.rs`: login and per-request authentication
//! - `bootstrap.rs`: one-time administrator seeding
//! - `accounts.rs` / `clients.rs` / `shipments.rs` / `alerts.rs`: gated
//!   CRUD, one file per entity
//! - `error.rs`: the outward error taxonomy

pub mod accounts;
pub mod alerts;
pub mod bootstrap;
pub mod clients;
pub mod error;
pub mod services;
pub mod session;
pub mod shipments;

pub use error::{ErrorKind, ServiceError};
pub use services::Services;
pub use session::Session;
