use logipilot_auth::{Role, TokenService};
use logipilot_core::Settings;

/// Per-operation role requirements.
///
/// Mutations on logistics entities need admin or manager; deletes need
/// admin; reads need any authenticated active account. Account
/// administration is admin-only throughout.
pub(crate) const ADMIN: &[Role] = &[Role::Admin];
pub(crate) const ADMIN_OR_MANAGER: &[Role] = &[Role::Admin, Role::Manager];
pub(crate) const ANY_ROLE: &[Role] = &Role::ALL;

/// Service facade over a storage backend.
///
/// One instance serves the whole process. Account state is re-resolved
/// through the store on every call, never cached here, so privilege changes
/// apply to the very next request.
pub struct Services<S> {
    pub(crate) store: S,
    pub(crate) tokens: TokenService,
}

impl<S> Services<S> {
    pub fn new(store: S, settings: &Settings) -> Self {
        Self {
            store,
            tokens: TokenService::new(settings),
        }
    }

    /// The underlying store (tests, maintenance tooling).
    pub fn store(&self) -> &S {
        &self.store
    }
}
