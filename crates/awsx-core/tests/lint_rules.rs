//! Linter behaviour over whole documents.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tracing::Level;

use awsx_core::lint::{self, lint_allowed_actions, LintRules, Rule};

mod log_capture;
use log_capture::LogCapture;

#[test]
fn forbidden_action_logs_one_warning() {
    let doc: serde_yaml::Value =
        serde_yaml::from_str("policies: [{name: p1, actions: [stop]}]").unwrap();
    let allowed = vec!["tag".to_string()];

    let logs = LogCapture::default();
    let ok = logs.run(|| lint_allowed_actions(&doc, &allowed));

    assert!(!ok);
    let warns = logs.at(Level::WARN);
    assert_eq!(warns.len(), 1);
    assert!(warns[0].message.contains("p1"));
    assert!(warns[0].message.contains("stop"));
}

#[test]
fn every_enabled_rule_runs() {
    let input = "policies:\n  - name: p1\n    resource: sqs\n    actions: [delete]\n";
    let logs = LogCapture::default();
    let report = logs.run(|| lint::lint(input, &LintRules::default())).unwrap();

    assert_eq!(report.len(), 1);
    let failed: Vec<Rule> = report[0].failed().collect();
    assert_eq!(
        failed,
        [
            Rule::RequireDescription,
            Rule::AllowedActions,
            Rule::RequireDocumentSeparator,
            Rule::RequireComments,
            Rule::RequireVersionComment,
        ]
    );
    assert_eq!(logs.at(Level::WARN).len(), 5);
}

#[test]
fn disabled_rules_are_skipped() {
    let rules = lint::config::load_from_str(
        "[rules]\nrequire_document_separator = false\nrequire_version_comment = false\nallowed_actions_list = [\"tag\", \"notify\", \"delete\"]\n",
    )
    .unwrap();
    let input = "# queues\npolicies:\n  - name: p1\n    description: purge\n    resource: sqs\n    actions: [delete]\n";
    let report = lint::lint(input, &rules).unwrap();

    let rules_run: Vec<Rule> = report[0].outcomes.iter().map(|(r, _)| *r).collect();
    assert_eq!(
        rules_run,
        [Rule::RequireDescription, Rule::AllowedActions, Rule::RequireComments]
    );
    assert_eq!(report[0].failed().count(), 0);
}

#[test]
fn multi_document_stream() {
    let input = "---\n# Cloud Custodian version 0.9\npolicies: [{name: a, description: x, actions: [tag]}]\n---\npolicies: [{name: b, actions: [tag]}]\n";
    let report = lint::lint(input, &LintRules::default()).unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report[0].failed().count(), 0);
    assert_eq!(report[1].failed().collect::<Vec<_>>(), [Rule::RequireDescription]);
}

#[test]
fn invalid_yaml_is_an_error() {
    let err = lint::lint("policies: [unclosed", &LintRules::default()).unwrap_err();
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn read_input_prefers_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p.yml");
    std::fs::write(&path, "policies: []\n").unwrap();
    assert_eq!(lint::read_input(path.to_str().unwrap()).unwrap(), "policies: []\n");
    assert_eq!(lint::read_input("policies: []").unwrap(), "policies: []");
}
