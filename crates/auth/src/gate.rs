//! Authorization gate: resolve a bearer token, then check roles.
//!
//! Authentication always runs (and fails) before authorization is attempted,
//! so an unauthenticated caller never learns which roles an operation wants.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::directory::{AccountDirectory, DirectoryError};
use crate::token::TokenService;
use crate::{Account, Role};

/// Authentication failure.
///
/// Token problems and unknown subjects collapse into `InvalidCredentials` on
/// purpose: a caller must not be able to distinguish "no such account" from
/// "bad token" (account-enumeration hardening).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("inactive account")]
    InactiveAccount,

    /// The directory itself failed; not an authentication decision.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Authorization failure: the account's role is not in the required set.
///
/// Carries only the caller's own role and the requirement, for diagnostics.
/// Never any other account's data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("role '{role}' does not satisfy the required roles")]
pub struct Forbidden {
    pub role: Role,
    pub required: Vec<Role>,
}

/// Resolve a bearer token to its current account.
///
/// Validates signature and expiry, then re-reads the account from the
/// directory (the token's role claim is advisory only) and rejects
/// inactive accounts. The directory lookup is awaited to completion before
/// any authorization decision can run.
pub async fn authenticate<D: AccountDirectory + ?Sized>(
    directory: &D,
    tokens: &TokenService,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Account, AuthError> {
    let claims = tokens
        .validate(token, now)
        .map_err(|_| AuthError::InvalidCredentials)?;

    let account = directory
        .find_by_id(claims.sub)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !account.active {
        return Err(AuthError::InactiveAccount);
    }

    Ok(account)
}

/// Allow iff the account's current role is in `required`.
///
/// `required` is a non-empty fixed set chosen per protected operation; a
/// single-role requirement is the one-element case.
pub fn authorize(account: &Account, required: &[Role]) -> Result<(), Forbidden> {
    debug_assert!(!required.is_empty(), "required role set must be non-empty");

    if required.contains(&account.role) {
        Ok(())
    } else {
        Err(Forbidden {
            role: account.role,
            required: required.to_vec(),
        })
    }
}
