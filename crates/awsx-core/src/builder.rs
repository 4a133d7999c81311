//! Fluent policy builder.
//!
//! ```
//! use awsx_core::builder::{ActionBuilder, FilterBuilder, PolicyBuilder};
//!
//! let yaml = PolicyBuilder::new("ec2-stop-policy")
//!     .resource("ec2")
//!     .mode("periodic", [("schedule", "rate(5 minutes)")])
//!     .add_filter(FilterBuilder::new("InstanceId").value("i-1234567890abcdef0"))
//!     .add_action(ActionBuilder::new("stop"))
//!     .add_action(ActionBuilder::new("tag").set_key("Owner").set_value("DevOps"))
//!     .export_to_yaml()
//!     .unwrap();
//! assert!(yaml.starts_with("policies:"));
//! ```

use serde_yaml::{Mapping, Value};

use crate::error::{AwsxError, Result};
use crate::policy::{PolicyDeclaration, PolicySet};

fn key(k: &str) -> Value {
    Value::String(k.to_owned())
}

/// A bare name when there are no parameters, `{name: params}` otherwise.
fn named_entry(name: &str, params: &Mapping) -> Value {
    if params.is_empty() {
        return key(name);
    }
    let mut m = Mapping::new();
    m.insert(key(name), Value::Mapping(params.clone()));
    Value::Mapping(m)
}

#[derive(Debug, Clone)]
pub struct FilterBuilder {
    name: String,
    params: Mapping,
}

impl FilterBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), params: Mapping::new() }
    }

    /// Simple equality filter.
    pub fn value(mut self, val: impl Into<Value>) -> Self {
        self.params.insert(key("value"), val.into());
        self
    }

    pub fn custom<K, V, I>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (k, v) in params {
            self.params.insert(key(k.as_ref()), v.into());
        }
        self
    }

    pub fn build(&self) -> Value {
        named_entry(&self.name, &self.params)
    }
}

#[derive(Debug, Clone)]
pub struct ActionBuilder {
    action_type: String,
    params: Mapping,
}

impl ActionBuilder {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self { action_type: action_type.into(), params: Mapping::new() }
    }

    pub fn set_key(mut self, k: impl Into<Value>) -> Self {
        self.params.insert(key("key"), k.into());
        self
    }

    pub fn set_value(mut self, v: impl Into<Value>) -> Self {
        self.params.insert(key("value"), v.into());
        self
    }

    pub fn custom<K, V, I>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (k, v) in params {
            self.params.insert(key(k.as_ref()), v.into());
        }
        self
    }

    pub fn build(&self) -> Value {
        named_entry(&self.action_type, &self.params)
    }
}

#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    name: String,
    resource_type: Option<String>,
    execution_mode: Option<Mapping>,
    filters: Vec<Value>,
    actions: Vec<Value>,
}

impl PolicyBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: None,
            execution_mode: None,
            filters: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn resource(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    /// Execution mode `{type: mode_type, ..params}`.
    pub fn mode<K, V, I>(mut self, mode_type: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut m = Mapping::new();
        m.insert(key("type"), Value::String(mode_type.into()));
        for (k, v) in params {
            m.insert(key(k.as_ref()), v.into());
        }
        self.execution_mode = Some(m);
        self
    }

    pub fn add_filter(mut self, filter: FilterBuilder) -> Self {
        self.filters.push(filter.build());
        self
    }

    pub fn add_action(mut self, action: ActionBuilder) -> Self {
        self.actions.push(action.build());
        self
    }

    /// The policy as a YAML mapping. An unset resource is `null`.
    pub fn build(&self) -> Value {
        let mut m = Mapping::new();
        m.insert(key("name"), Value::String(self.name.clone()));
        m.insert(
            key("resource"),
            self.resource_type.clone().map(Value::String).unwrap_or(Value::Null),
        );
        m.insert(key("filters"), Value::Sequence(self.filters.clone()));
        m.insert(key("actions"), Value::Sequence(self.actions.clone()));
        if let Some(mode) = &self.execution_mode {
            m.insert(key("mode"), Value::Mapping(mode.clone()));
        }
        Value::Mapping(m)
    }

    /// Typed declaration; fails when no resource was set.
    pub fn build_declaration(&self) -> Result<PolicyDeclaration> {
        if self.resource_type.is_none() {
            return Err(AwsxError::InvalidPolicy(format!(
                "policy {} has no resource type",
                self.name
            )));
        }
        serde_yaml::from_value(self.build())
            .map_err(|e| AwsxError::InvalidPolicy(format!("policy {}: {e}", self.name)))
    }

    /// `policies:` document holding this one policy.
    pub fn export_to_yaml(&self) -> Result<String> {
        let mut root = Mapping::new();
        root.insert(key("policies"), Value::Sequence(vec![self.build()]));
        serde_yaml::to_string(&Value::Mapping(root))
            .map_err(|e| AwsxError::Internal(format!("yaml encode failed: {e}")))
    }
}

/// Collect built policies into a set, checking names.
pub fn build_set(name: &str, builders: &[PolicyBuilder]) -> Result<PolicySet> {
    let decls = builders
        .iter()
        .map(PolicyBuilder::build_declaration)
        .collect::<Result<Vec<_>>>()?;
    PolicySet::new(name, decls)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::policy::parse_policy_str;

    fn sample() -> PolicyBuilder {
        PolicyBuilder::new("ec2-stop-policy")
            .resource("ec2")
            .mode("periodic", [("schedule", "rate(5 minutes)")])
            .add_filter(FilterBuilder::new("InstanceId").value("i-1234567890abcdef0"))
            .add_action(ActionBuilder::new("stop"))
            .add_action(ActionBuilder::new("tag").set_key("Owner").set_value("DevOps"))
    }

    #[test]
    fn bare_names_without_params() {
        assert_eq!(FilterBuilder::new("tag-count").build(), Value::String("tag-count".into()));
        assert_eq!(ActionBuilder::new("stop").build(), Value::String("stop".into()));
    }

    #[test]
    fn builds_nested_entries() {
        let p = sample().build();
        assert_eq!(p["filters"][0]["InstanceId"]["value"].as_str(), Some("i-1234567890abcdef0"));
        assert_eq!(p["actions"][1]["tag"]["key"].as_str(), Some("Owner"));
        assert_eq!(p["mode"]["type"].as_str(), Some("periodic"));
        assert_eq!(p["mode"]["schedule"].as_str(), Some("rate(5 minutes)"));
    }

    #[test]
    fn exported_yaml_loads_back() {
        let yaml = sample().export_to_yaml().unwrap();
        let set = parse_policy_str(&yaml, "built").unwrap();
        let p = set.get("ec2-stop-policy").unwrap();
        assert_eq!(p.resource_type, "ec2");
        assert_eq!(p.mode_type(), "periodic");
        assert_eq!(p.actions.len(), 2);
    }

    #[test]
    fn declaration_requires_resource() {
        let err = PolicyBuilder::new("x").build_declaration().unwrap_err();
        assert_eq!(err.code().as_str(), "INVALID_POLICY");
        assert!(PolicyBuilder::new("x").build()["resource"].is_null());
    }

    #[test]
    fn custom_params_merge() {
        let f = FilterBuilder::new("value")
            .custom([("key", "tag:Owner"), ("op", "absent")])
            .build();
        assert_eq!(f["value"]["op"].as_str(), Some("absent"));
    }
}
