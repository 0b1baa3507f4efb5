use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use logipilot_core::AccountId;

use crate::Role;
use crate::token::TokenError;

/// Access token claims (transport-agnostic).
///
/// The embedded role is advisory only: authorization re-reads the account's
/// current role and active flag from the directory on every request, so a
/// downgrade or deactivation takes effect before the token expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the account the token was issued to.
    pub sub: AccountId,

    /// Role held by the account at issuance time.
    pub role: Role,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

/// Deterministically validate decoded claims against `now`.
///
/// Note: this validates the *claims* only. Signature verification and
/// decoding happen in [`crate::TokenService`].
pub fn validate_claims(claims: &AccessClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenError::Expired);
    }
    Ok(())
}
