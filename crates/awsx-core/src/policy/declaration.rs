use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::{AwsxError, Result};

/// One operator-authored policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDeclaration {
    pub name: String,
    /// Resource type, possibly provider-qualified (`awsx.sqs`).
    #[serde(rename = "resource")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Value>,
    /// Keys the engine understands but this crate does not interpret
    /// (`description`, `comment`, `tags`, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PolicyDeclaration {
    /// Resource type with `<prefix>.` removed, if present.
    ///
    /// Only the first segment is considered, so `awsx.graphql-api` becomes
    /// `graphql-api` while an unqualified `queue` is returned as is.
    pub fn unqualified_resource_type(&self, prefix: &str) -> &str {
        match self.resource_type.split_once('.') {
            Some((p, rest)) if p == prefix => rest,
            _ => &self.resource_type,
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.extra.get("description").and_then(Value::as_str)
    }

    /// Execution mode type (`pull` when absent).
    pub fn mode_type(&self) -> &str {
        self.mode
            .as_ref()
            .and_then(|m| m.get("type"))
            .and_then(Value::as_str)
            .unwrap_or("pull")
    }
}

/// Named, ordered collection of policy declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicySet {
    pub name: String,
    policies: Vec<PolicyDeclaration>,
}

impl PolicySet {
    /// Build a set, rejecting empty or duplicate policy names.
    pub fn new(name: impl Into<String>, policies: Vec<PolicyDeclaration>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(policies.len());
        for p in &policies {
            if p.name.trim().is_empty() {
                return Err(AwsxError::InvalidPolicy("policy name must not be empty".into()));
            }
            if !seen.insert(p.name.as_str()) {
                return Err(AwsxError::InvalidPolicy(format!(
                    "duplicate policy name: {}",
                    p.name
                )));
            }
        }
        Ok(Self { name: name.into(), policies })
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PolicyDeclaration> {
        self.policies.iter()
    }

    pub fn get(&self, name: &str) -> Option<&PolicyDeclaration> {
        self.policies.iter().find(|p| p.name == name)
    }

    /// Distinct resource types referenced by the set, as written.
    pub fn resource_types(&self) -> BTreeSet<&str> {
        self.policies.iter().map(|p| p.resource_type.as_str()).collect()
    }

    /// Append another set, keeping order and the duplicate-name check.
    pub fn extend(&mut self, other: PolicySet) -> Result<()> {
        let mut merged = std::mem::take(&mut self.policies);
        merged.extend(other.policies);
        *self = PolicySet::new(std::mem::take(&mut self.name), merged)?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PolicySet {
    type Item = &'a PolicyDeclaration;
    type IntoIter = std::slice::Iter<'a, PolicyDeclaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.policies.iter()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn decl(name: &str, resource: &str) -> PolicyDeclaration {
        PolicyDeclaration {
            name: name.into(),
            resource_type: resource.into(),
            filters: vec![],
            actions: vec![],
            mode: None,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn strips_only_matching_prefix() {
        assert_eq!(decl("a", "awsx.sqs").unqualified_resource_type("awsx"), "sqs");
        assert_eq!(
            decl("a", "awsx.graphql-api").unqualified_resource_type("awsx"),
            "graphql-api"
        );
        assert_eq!(decl("a", "aws.ec2").unqualified_resource_type("awsx"), "aws.ec2");
        assert_eq!(decl("a", "queue").unqualified_resource_type("awsx"), "queue");
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = PolicySet::new("s", vec![decl("a", "sqs"), decl("a", "sqs")]).unwrap_err();
        assert_eq!(err.code().as_str(), "INVALID_POLICY");
    }

    #[test]
    fn extend_keeps_order() {
        let mut a = PolicySet::new("s", vec![decl("a", "sqs")]).unwrap();
        let b = PolicySet::new("t", vec![decl("b", "ec2")]).unwrap();
        a.extend(b).unwrap();
        let names: Vec<_> = a.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(a.name, "s");
    }
}
