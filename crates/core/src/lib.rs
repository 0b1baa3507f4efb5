//! `logipilot-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod config;
pub mod error;
pub mod id;

pub use config::Settings;
pub use error::{DomainError, DomainResult};
pub use id::{AccountId, AlertId, ClientId, ShipmentId};
