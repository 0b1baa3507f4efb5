//! Account model and its input types.

use logipilot_core::{AccountId, DomainResult};

use crate::Role;

/// Minimum plaintext password length accepted for accounts.
pub const MIN_PASSWORD_LEN: usize = 8;

/// An authentication identity.
///
/// `password_hash` is the salted digest, never the plaintext. The struct is
/// deliberately not serializable; transports map it to their own view types
/// so the hash cannot leak through a generic encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
}

/// Input for creating an account (plaintext password; hashed before it ever
/// reaches storage).
#[derive(Debug, Clone)]
pub struct AccountDraft {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub active: bool,
}

impl AccountDraft {
    pub fn validate(&self) -> DomainResult<()> {
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

/// Partial account update; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

impl AccountPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        Ok(())
    }
}

/// Canonical form of a login email: trimmed and lowercased.
///
/// Applied on account creation/update and on every lookup, so `A@x.com` and
/// `a@x.com` name the same account.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> DomainResult<()> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(logipilot_core::DomainError::validation(
            "invalid email format",
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(logipilot_core::DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
