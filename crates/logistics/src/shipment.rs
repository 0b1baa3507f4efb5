use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use logipilot_core::{ClientId, DomainError, DomainResult, ShipmentId};

/// Shipment lifecycle status. Plain enumeration, no transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    #[default]
    Pending,
    InTransit,
    Delivered,
    Cancelled,
    Delayed,
}

impl ShipmentStatus {
    /// Storage/transport string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "pending",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Cancelled => "cancelled",
            ShipmentStatus::Delayed => "delayed",
        }
    }
}

impl core::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ShipmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ShipmentStatus::Pending),
            "in_transit" => Ok(ShipmentStatus::InTransit),
            "delivered" => Ok(ShipmentStatus::Delivered),
            "cancelled" => Ok(ShipmentStatus::Cancelled),
            "delayed" => Ok(ShipmentStatus::Delayed),
            other => Err(DomainError::validation(format!(
                "unknown shipment status '{other}'"
            ))),
        }
    }
}

/// A shipment, owned by exactly one client.
///
/// The client reference must resolve at creation time and whenever it is
/// reassigned. Owns its alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    pub client_id: ClientId,
    pub origin: String,
    pub destination: String,
    pub status: ShipmentStatus,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a shipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentDraft {
    pub client_id: ClientId,
    pub origin: String,
    pub destination: String,
    pub status: ShipmentStatus,
}

impl ShipmentDraft {
    pub fn validate(&self) -> DomainResult<()> {
        validate_place("origin", &self.origin)?;
        validate_place("destination", &self.destination)
    }
}

/// Partial shipment update; `None` fields keep their current value.
///
/// A present `client_id` reassigns the shipment; the new client must exist
/// or the whole update is refused with the prior state untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipmentPatch {
    pub client_id: Option<ClientId>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub status: Option<ShipmentStatus>,
}

impl ShipmentPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(origin) = &self.origin {
            validate_place("origin", origin)?;
        }
        if let Some(destination) = &self.destination {
            validate_place("destination", destination)?;
        }
        Ok(())
    }
}

fn validate_place(field: &str, value: &str) -> DomainResult<()> {
    let len = value.chars().count();
    if !(2..=200).contains(&len) {
        return Err(DomainError::validation(format!(
            "{field} must be 2..=200 characters"
        )));
    }
    Ok(())
}
