//! Policy file loading and `policies:` header recovery.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::{AwsxError, Result};

use super::declaration::{PolicyDeclaration, PolicySet};

const POLICIES_KEY: &str = "policies";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyFile {
    policies: Vec<PolicyDeclaration>,
    #[serde(default)]
    #[allow(dead_code)]
    vars: Option<Value>,
}

/// Parse one policy document into a set called `name`.
pub fn parse_policy_str(s: &str, name: &str) -> Result<PolicySet> {
    let file: PolicyFile = serde_yaml::from_str(s).map_err(|e| {
        if has_policies_header(s) {
            AwsxError::InvalidPolicy(format!("{name}: {e}"))
        } else {
            AwsxError::InvalidPolicy(format!("{name}: missing top-level `policies:` key ({e})"))
        }
    })?;
    PolicySet::new(name, file.policies)
}

/// Load and concatenate policy files in argument order.
pub fn load_policy_files<P: AsRef<Path>>(paths: &[P]) -> Result<PolicySet> {
    let mut set: Option<PolicySet> = None;
    for path in paths {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .map_err(|e| AwsxError::BadRequest(format!("read {} failed: {e}", path.display())))?;
        let name = path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let parsed = parse_policy_str(&s, &name)?;
        tracing::debug!(file = %path.display(), policies = parsed.len(), "loaded policy file");
        match set.as_mut() {
            Some(acc) => acc.extend(parsed)?,
            None => set = Some(parsed),
        }
    }
    set.ok_or_else(|| AwsxError::BadRequest("no policy files given".into()))
}

/// Cheap textual check used before handing a file to the engine.
pub fn has_policies_header(text: &str) -> bool {
    text.contains("policies:")
}

/// Prepend `policies:` and indent every line by two spaces.
///
/// Documentation snippets often show a bare list of policies; this turns
/// them into a loadable file without reparsing.
pub fn wrap_policies_header(text: &str) -> String {
    let indented = text
        .split('\n')
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{POLICIES_KEY}:\n{indented}")
}

/// Structural variant of [`wrap_policies_header`].
///
/// A mapping without `policies` becomes a one-element list under
/// `policies`; a sequence is nested under `policies` as is. Documents that
/// already carry the key are returned unchanged.
pub fn normalize_policies_document(doc: Value) -> Result<Value> {
    if doc.get(POLICIES_KEY).is_some() {
        return Ok(doc);
    }
    let policies = match doc {
        Value::Mapping(m) => {
            tracing::info!("`policies:` header missing, wrapping mapping in a list");
            Value::Sequence(vec![Value::Mapping(m)])
        }
        Value::Sequence(s) => {
            tracing::info!("`policies:` header missing, nesting list");
            Value::Sequence(s)
        }
        other => {
            return Err(AwsxError::InvalidPolicy(format!(
                "expected a mapping or a list, found {}",
                value_kind(&other)
            )))
        }
    };
    let mut root = Mapping::new();
    root.insert(Value::String(POLICIES_KEY.into()), policies);
    Ok(Value::Mapping(root))
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
