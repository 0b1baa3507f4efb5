//! Signed access token issuance and validation (HS256).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use logipilot_core::{AccountId, Settings};

use crate::Role;
use crate::claims::{AccessClaims, validate_claims};

/// Why a token failed.
///
/// Callers facing untrusted clients should collapse all of these into one
/// "invalid credentials" signal; the distinction exists for tests and
/// diagnostics only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("failed to sign token")]
    Signing,
}

/// Issues and validates bearer tokens signed with the process-wide secret.
///
/// The scheme is stateless: no server-side session record exists, so a token
/// cannot be revoked before its natural expiry. Rotating the signing secret
/// is the only kill switch, and it invalidates every outstanding token.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(settings: &Settings) -> Self {
        let secret = settings.secret_key.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: settings.token_ttl,
        }
    }

    /// Issue a token for `account_id` carrying `role`, expiring after the
    /// configured TTL.
    ///
    /// The subject claim is structurally mandatory: issuance cannot produce
    /// a token without it.
    pub fn issue(
        &self,
        account_id: AccountId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = AccessClaims {
            sub: account_id,
            role,
            issued_at: now,
            expires_at: now + self.ttl,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    /// Verify signature and structure, then the time window against `now`.
    ///
    /// Never returns partial claims: tampering anywhere, a missing subject,
    /// or an out-of-window timestamp rejects the whole token.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the caller-supplied clock, with no
        // leeway, instead of the library's system-clock check.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<AccessClaims>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&Settings {
            secret_key: secret.to_string(),
            ..Default::default()
        })
    }

    fn issue_at(svc: &TokenService, now: DateTime<Utc>) -> String {
        svc.issue(AccountId::new(7), Role::Manager, now).unwrap()
    }

    #[test]
    fn issued_token_carries_subject_and_role() {
        let svc = service("test-secret");
        let now = Utc::now();

        let token = issue_at(&svc, now);
        let claims = svc.validate(&token, now).unwrap();

        assert_eq!(claims.sub, AccountId::new(7));
        assert_eq!(claims.role, Role::Manager);
        assert_eq!(claims.expires_at - claims.issued_at, Duration::minutes(30));
    }

    #[test]
    fn token_validates_inside_ttl_and_expires_at_the_boundary() {
        let svc = service("test-secret");
        let now = Utc::now();
        let token = issue_at(&svc, now);

        assert!(svc.validate(&token, now).is_ok());
        assert!(svc.validate(&token, now + Duration::minutes(29)).is_ok());
        assert_eq!(
            svc.validate(&token, now + Duration::minutes(30)),
            Err(TokenError::Expired)
        );
        assert_eq!(
            svc.validate(&token, now + Duration::days(1)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn tampered_signature_is_rejected_deterministically() {
        let svc = service("test-secret");
        let now = Utc::now();
        let token = issue_at(&svc, now);

        // Flip one character in the signature section.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        let first = svc.validate(&tampered, now);
        let second = svc.validate(&tampered, now);
        assert!(first.is_err());
        assert_eq!(first, second);
    }

    #[test]
    fn token_signed_with_a_different_secret_is_rejected() {
        let issuer = service("secret-one");
        let verifier = service("secret-two");
        let now = Utc::now();

        let token = issue_at(&issuer, now);
        assert_eq!(
            verifier.validate(&token, now),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let svc = service("test-secret");
        assert_eq!(
            svc.validate("not.a.token", Utc::now()),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn token_without_subject_is_rejected() {
        let svc = service("test-secret");
        let now = Utc::now();

        // Hand-roll a token with the right signature but no `sub` claim.
        let claims = serde_json::json!({
            "role": "admin",
            "iat": now.timestamp(),
            "exp": (now + Duration::minutes(30)).timestamp(),
        });
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(svc.validate(&token, now), Err(TokenError::Malformed));
    }
}
