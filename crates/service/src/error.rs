//! Service-level error taxonomy.

use thiserror::Error;

use logipilot_auth::{AuthError, CredentialError, Forbidden, TokenError};
use logipilot_core::DomainError;
use logipilot_infra::StoreError;

/// Error from a service operation.
///
/// Wraps the layer-specific errors so callers get one type; the outward
/// classification lives in [`ErrorKind`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Forbidden(#[from] Forbidden),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Token issuance failed (signing fault, not a client error).
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Password hashing failed (infrastructure fault).
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// An administrator may not delete the account they are signed in as.
    #[error("administrators cannot delete their own account")]
    SelfDeleteForbidden,
}

/// Outward-facing classification.
///
/// Exactly one kind per error so a transport can map each to a distinct
/// signal. `Internal` covers unexpected infrastructure failures; its detail
/// must never be surfaced to external callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidCredentials,
    InactiveAccount,
    Forbidden,
    ParentNotFound,
    DuplicateKey,
    NotFound,
    SelfDeleteForbidden,
    Invalid,
    Internal,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Auth(AuthError::InvalidCredentials) => ErrorKind::InvalidCredentials,
            ServiceError::Auth(AuthError::InactiveAccount) => ErrorKind::InactiveAccount,
            ServiceError::Auth(AuthError::Directory(_)) => ErrorKind::Internal,
            ServiceError::Forbidden(_) => ErrorKind::Forbidden,
            ServiceError::Domain(_) => ErrorKind::Invalid,
            ServiceError::Store(StoreError::NotFound { .. }) => ErrorKind::NotFound,
            ServiceError::Store(StoreError::ParentNotFound { .. }) => ErrorKind::ParentNotFound,
            ServiceError::Store(StoreError::DuplicateEmail { .. }) => ErrorKind::DuplicateKey,
            ServiceError::Store(StoreError::Unavailable(_)) => ErrorKind::Internal,
            ServiceError::Token(_) => ErrorKind::Internal,
            ServiceError::Credential(_) => ErrorKind::Internal,
            ServiceError::SelfDeleteForbidden => ErrorKind::SelfDeleteForbidden,
        }
    }
}
