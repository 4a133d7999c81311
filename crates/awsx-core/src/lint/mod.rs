//! YAML policy linter.
//!
//! Rules are independent boolean checks. The linter runs every enabled rule
//! on every document and reports each outcome; it does not stop at the first
//! failure and does not fold the outcomes into a single verdict.

pub mod config;
pub mod rules;

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::{AwsxError, Result};

pub use config::LintRules;
pub use rules::{
    action_name, lint_allowed_actions, lint_require_comments, lint_require_description,
    lint_require_document_separator, lint_require_version_comment,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    RequireDescription,
    AllowedActions,
    RequireDocumentSeparator,
    RequireComments,
    RequireVersionComment,
}

impl Rule {
    pub fn as_str(self) -> &'static str {
        match self {
            Rule::RequireDescription => "require_description",
            Rule::AllowedActions => "allowed_actions",
            Rule::RequireDocumentSeparator => "require_document_separator",
            Rule::RequireComments => "require_comments",
            Rule::RequireVersionComment => "require_version_comment",
        }
    }
}

/// Outcomes for one YAML document, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLint {
    pub index: usize,
    pub outcomes: Vec<(Rule, bool)>,
}

impl DocumentLint {
    pub fn failed(&self) -> impl Iterator<Item = Rule> + '_ {
        self.outcomes.iter().filter(|(_, ok)| !ok).map(|(r, _)| *r)
    }
}

/// Parse every document of a multi-document YAML stream.
pub fn load_yaml_documents(input: &str) -> Result<Vec<Value>> {
    serde_yaml::Deserializer::from_str(input)
        .map(|doc| {
            Value::deserialize(doc).map_err(|e| AwsxError::BadRequest(format!("invalid yaml: {e}")))
        })
        .collect()
}

/// Lint a YAML stream with the enabled rules.
///
/// Text rules look at the whole input, so with several documents they run
/// once per document against the same text.
pub fn lint(input: &str, rules: &LintRules) -> Result<Vec<DocumentLint>> {
    let docs = load_yaml_documents(input)?;
    let mut out = Vec::with_capacity(docs.len());

    for (index, doc) in docs.iter().enumerate() {
        let mut outcomes = Vec::new();
        if rules.require_description {
            outcomes.push((Rule::RequireDescription, lint_require_description(doc)));
        }
        if rules.allowed_actions {
            outcomes.push((
                Rule::AllowedActions,
                lint_allowed_actions(doc, &rules.allowed_actions_list),
            ));
        }
        if rules.require_document_separator {
            outcomes.push((
                Rule::RequireDocumentSeparator,
                lint_require_document_separator(input),
            ));
        }
        if rules.require_comments {
            outcomes.push((Rule::RequireComments, lint_require_comments(input)));
        }
        if rules.require_version_comment {
            outcomes.push((Rule::RequireVersionComment, lint_require_version_comment(input)));
        }
        out.push(DocumentLint { index, outcomes });
    }
    Ok(out)
}

/// Treat `source` as a path when it names an existing file, else as YAML.
pub fn read_input(source: &str) -> Result<String> {
    let path = Path::new(source);
    if path.is_file() {
        return fs::read_to_string(path)
            .map_err(|e| AwsxError::BadRequest(format!("read {source} failed: {e}")));
    }
    Ok(source.to_owned())
}
