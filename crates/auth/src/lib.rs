//! `logipilot-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: storage
//! backends implement [`AccountDirectory`], transports carry the bearer
//! token string, and everything in between stays deterministic and testable.

pub mod account;
pub mod claims;
pub mod directory;
pub mod gate;
pub mod password;
pub mod roles;
pub mod token;

pub use account::{Account, AccountDraft, AccountPatch};
pub use claims::{AccessClaims, validate_claims};
pub use directory::{AccountDirectory, DirectoryError};
pub use gate::{AuthError, Forbidden, authenticate, authorize};
pub use password::CredentialError;
pub use roles::Role;
pub use token::{TokenError, TokenService};
