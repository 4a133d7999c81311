//! Session factory descriptor.
//!
//! Credentials are resolved by the host engine; this is the value it needs
//! to build sessions for one run. Expanded policy instances share one handle
//! per policy set so the engine can reuse region-scoped sessions.

use std::sync::Arc;

use crate::options::RunOptions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFactory {
    /// Default region for sessions that are not region-scoped by the caller.
    pub region: Option<String>,
    pub profile: Option<String>,
    pub assume_role: Option<String>,
    pub external_id: Option<String>,
    pub session_policy: Option<String>,
}

/// Handle shared by every instance of one policy set.
pub type SessionHandle = Arc<SessionFactory>;

impl SessionFactory {
    pub fn from_options(options: &RunOptions) -> Self {
        Self {
            region: options.first_concrete_region().map(str::to_owned),
            profile: options.profile.clone(),
            assume_role: options.assume_role.clone(),
            external_id: options.external_id.clone(),
            session_policy: options.session_policy.clone(),
        }
    }

    pub fn into_handle(self) -> SessionHandle {
        Arc::new(self)
    }
}
