//! Provider and resource registries.
//!
//! Registration is explicit: [`initialize`] registers the `awsx` provider
//! into a cloud registry, and the provider registers its resource types
//! into its own registry when it is built. Nothing registers itself as a
//! side effect of being linked in.

#[allow(clippy::module_inception)]
mod registry;

use std::sync::Arc;

use awsx_core::error::Result;

use crate::provider::{Awsx, Provider};

pub use registry::PluginRegistry;

/// Providers keyed by cloud name (`awsx`).
pub type CloudRegistry = PluginRegistry<dyn Provider>;

pub fn new_cloud_registry() -> CloudRegistry {
    PluginRegistry::new("clouds")
}

/// Register the `awsx` provider. Fails if it is already registered.
pub fn initialize(clouds: &CloudRegistry, provider: Awsx) -> Result<Arc<Awsx>> {
    let provider = Arc::new(provider);
    clouds.register(provider.name(), Arc::clone(&provider) as Arc<dyn Provider>)?;
    tracing::info!(
        provider = provider.name(),
        resources = ?provider.resources().keys(),
        "provider registered"
    );
    Ok(provider)
}
