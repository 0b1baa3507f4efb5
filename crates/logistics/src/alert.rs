use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use logipilot_core::{AlertId, DomainError, DomainResult, ShipmentId};

/// Alert severity. Plain enumeration, no transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    /// Storage/transport string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl core::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for AlertSeverity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(AlertSeverity::Low),
            "medium" => Ok(AlertSeverity::Medium),
            "high" => Ok(AlertSeverity::High),
            "critical" => Ok(AlertSeverity::Critical),
            other => Err(DomainError::validation(format!(
                "unknown alert severity '{other}'"
            ))),
        }
    }
}

/// An alert raised against a shipment.
///
/// The shipment reference is set at creation and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub shipment_id: ShipmentId,
    pub message: String,
    pub severity: AlertSeverity,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDraft {
    pub shipment_id: ShipmentId,
    pub message: String,
    pub severity: AlertSeverity,
}

impl AlertDraft {
    pub fn validate(&self) -> DomainResult<()> {
        validate_message(&self.message)
    }
}

/// Partial alert update; `None` fields keep their current value.
///
/// `shipment_id` is present only so reassignment attempts can be rejected
/// explicitly: an alert's shipment reference is immutable once set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertPatch {
    pub shipment_id: Option<ShipmentId>,
    pub message: Option<String>,
    pub severity: Option<AlertSeverity>,
}

impl AlertPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if self.shipment_id.is_some() {
            return Err(DomainError::validation(
                "an alert's shipment reference is immutable",
            ));
        }
        if let Some(message) = &self.message {
            validate_message(message)?;
        }
        Ok(())
    }
}

fn validate_message(message: &str) -> DomainResult<()> {
    let len = message.chars().count();
    if !(5..=1000).contains(&len) {
        return Err(DomainError::validation(
            "alert message must be 5..=1000 characters",
        ));
    }
    Ok(())
}
