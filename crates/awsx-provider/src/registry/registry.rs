use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use awsx_core::error::{AwsxError, Result};

/// String-keyed plugin registry.
///
/// Populated by explicit registration calls at startup. A key can only be
/// registered once; a second attempt fails instead of silently replacing
/// the first plugin.
pub struct PluginRegistry<T: ?Sized> {
    name: String,
    plugins: DashMap<String, Arc<T>>,
}

impl<T: ?Sized> PluginRegistry<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plugins: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn register(&self, key: &str, plugin: Arc<T>) -> Result<()> {
        match self.plugins.entry(key.to_owned()) {
            Entry::Occupied(_) => Err(AwsxError::DuplicateRegistration {
                registry: self.name.clone(),
                key: key.to_owned(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(plugin);
                tracing::debug!(registry = %self.name, %key, "registered plugin");
                Ok(())
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.plugins.get(key).map(|e| Arc::clone(e.value()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.plugins.contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.plugins.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_is_rejected() {
        let reg: PluginRegistry<str> = PluginRegistry::new("things");
        reg.register("a", Arc::from("first")).unwrap();
        let err = reg.register("a", Arc::from("second")).unwrap_err();
        assert_eq!(err.code().as_str(), "DUPLICATE_REGISTRATION");
        assert_eq!(reg.get("a").as_deref(), Some("first"));
        assert_eq!(reg.keys(), vec!["a".to_string()]);
    }
}
