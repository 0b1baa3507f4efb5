use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use logipilot_core::{ClientId, DomainError, DomainResult};

/// Client lifecycle status.
///
/// A plain enumeration: any value may change to any other; no transition
/// rules are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Active,
    #[default]
    Prospect,
    Inactive,
    OnHold,
}

impl ClientStatus {
    /// Storage/transport string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Prospect => "prospect",
            ClientStatus::Inactive => "inactive",
            ClientStatus::OnHold => "on_hold",
        }
    }
}

impl core::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ClientStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ClientStatus::Active),
            "prospect" => Ok(ClientStatus::Prospect),
            "inactive" => Ok(ClientStatus::Inactive),
            "on_hold" => Ok(ClientStatus::OnHold),
            other => Err(DomainError::validation(format!(
                "unknown client status '{other}'"
            ))),
        }
    }
}

/// A business client.
///
/// Owns its shipments: deleting a client removes them, and their alerts,
/// as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: ClientStatus,
}

impl ClientDraft {
    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

/// Partial client update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<ClientStatus>,
}

impl ClientPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.is_empty() || name.chars().count() > 100 {
        return Err(DomainError::validation(
            "client name must be 1..=100 characters",
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> DomainResult<()> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> DomainResult<()> {
    if phone.chars().count() > 20 {
        return Err(DomainError::validation("phone must be at most 20 characters"));
    }
    Ok(())
}
