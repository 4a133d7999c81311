//! Individual lint rules.
//!
//! Every rule is independent, returns `true` when the input passes and logs
//! a warning for each problem it reports.

use std::borrow::Cow;

use serde_yaml::Value;

const VERSION_COMMENT: &str = "# Cloud Custodian version";

fn policies(doc: &Value) -> &[Value] {
    doc.get("policies")
        .and_then(Value::as_sequence)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn policy_name(policy: &Value) -> &str {
    policy.get("name").and_then(Value::as_str).unwrap_or("<unnamed>")
}

/// Name of an action entry.
///
/// `stop` is named `stop`; `{type: tag, key: k}` is named `tag`; a
/// single-key mapping such as `{tag: {key: k}}` is named after its key.
pub fn action_name(action: &Value) -> Cow<'_, str> {
    match action {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Mapping(m) => {
            if let Some(t) = m.get("type").and_then(Value::as_str) {
                return Cow::Borrowed(t);
            }
            match m.iter().next() {
                Some((Value::String(k), _)) if m.len() == 1 => Cow::Borrowed(k.as_str()),
                _ => Cow::Owned(serde_yaml::to_string(action).unwrap_or_default().trim().to_owned()),
            }
        }
        other => Cow::Owned(serde_yaml::to_string(other).unwrap_or_default().trim().to_owned()),
    }
}

/// Every policy carries a `description`. Stops at the first offender.
pub fn lint_require_description(doc: &Value) -> bool {
    for policy in policies(doc) {
        if policy.get("description").is_none() {
            tracing::warn!("policy {} is missing a description", policy_name(policy));
            return false;
        }
    }
    true
}

/// Actions are restricted to `allowed`. Reports every offender.
pub fn lint_allowed_actions(doc: &Value, allowed: &[String]) -> bool {
    let mut valid = true;
    for policy in policies(doc) {
        let actions = policy
            .get("actions")
            .and_then(Value::as_sequence)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        for action in actions {
            let name = action_name(action);
            if !allowed.iter().any(|a| a.as_str() == name) {
                tracing::warn!("policy {} uses forbidden action: {}", policy_name(policy), name);
                valid = false;
            }
        }
    }
    valid
}

pub fn lint_require_document_separator(input: &str) -> bool {
    if !input.trim_start().starts_with("---") {
        tracing::warn!("yaml document does not start with '---'");
        return false;
    }
    true
}

pub fn lint_require_comments(input: &str) -> bool {
    if !input.contains('#') {
        tracing::warn!("no comments found in yaml document");
        return false;
    }
    true
}

pub fn lint_require_version_comment(input: &str) -> bool {
    if !input.contains(VERSION_COMMENT) {
        tracing::warn!("no Cloud Custodian version comment found");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn doc(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn action_names() {
        assert_eq!(action_name(&doc("stop")), "stop");
        assert_eq!(action_name(&doc("{type: tag, key: k}")), "tag");
        assert_eq!(action_name(&doc("{notify: {to: [a]}}")), "notify");
    }

    #[test]
    fn description_rule() {
        assert!(lint_require_description(&doc(
            "policies: [{name: a, description: d}]"
        )));
        assert!(!lint_require_description(&doc("policies: [{name: a}]")));
        assert!(lint_require_description(&doc("other: 1")));
    }

    #[test]
    fn allowed_actions_rule() {
        let allowed = vec!["tag".to_string(), "notify".to_string()];
        assert!(lint_allowed_actions(
            &doc("policies: [{name: a, actions: [tag, {type: notify}]}]"),
            &allowed
        ));
        assert!(!lint_allowed_actions(
            &doc("policies: [{name: a, actions: [tag, terminate]}]"),
            &allowed
        ));
    }

    #[test]
    fn text_rules() {
        assert!(lint_require_document_separator("\n---\npolicies: []"));
        assert!(!lint_require_document_separator("policies: []"));
        assert!(lint_require_comments("# hi\npolicies: []"));
        assert!(!lint_require_comments("policies: []"));
        assert!(lint_require_version_comment("# Cloud Custodian version 0.9\n"));
        assert!(!lint_require_version_comment("# other\n"));
    }
}
