//! Lint rule configuration (TOML).
//!
//! ```toml
//! [rules]
//! require_description = true
//! allowed_actions = true
//! allowed_actions_list = ["tag", "notify"]
//! require_document_separator = false
//! require_comments = true
//! require_version_comment = false
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AwsxError, Result};

/// Which rules run. Every toggle defaults to on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintRules {
    pub require_description: bool,
    pub allowed_actions: bool,
    pub allowed_actions_list: Vec<String>,
    pub require_document_separator: bool,
    pub require_comments: bool,
    pub require_version_comment: bool,
}

impl Default for LintRules {
    fn default() -> Self {
        Self {
            require_description: true,
            allowed_actions: true,
            allowed_actions_list: default_allowed_actions(),
            require_document_separator: true,
            require_comments: true,
            require_version_comment: true,
        }
    }
}

fn default_allowed_actions() -> Vec<String> {
    vec!["tag".into(), "notify".into()]
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LintConfigFile {
    #[serde(default)]
    rules: LintRules,
}

pub fn load_from_str(s: &str) -> Result<LintRules> {
    let file: LintConfigFile =
        toml::from_str(s).map_err(|e| AwsxError::Config(format!("invalid lint config: {e}")))?;
    Ok(file.rules)
}

pub fn load_from_file(path: &Path) -> Result<LintRules> {
    let s = fs::read_to_string(path)
        .map_err(|e| AwsxError::Config(format!("read {} failed: {e}", path.display())))?;
    load_from_str(&s)
}

/// Like [`load_from_file`], but an absent file means "all defaults".
pub fn load_or_default(path: &Path) -> Result<LintRules> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "lint config not found, using defaults");
        return Ok(LintRules::default());
    }
    load_from_file(path)
}
