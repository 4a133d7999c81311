#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use awsx_provider::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
checker:
  listen: "127.0.0.1:8000"
  dryrun: false # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}

#[test]
fn listen_must_be_an_address() {
    let bad = r#"
version: 1
checker:
  listen: "localhost"
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.checker.listen, "127.0.0.1:8000");
    assert_eq!(cfg.checker.engine_program, "custodian");
    assert_eq!(cfg.checker.output_dir, "logs");
    assert!(cfg.checker.dry_run);
}

#[test]
fn engine_environment_from_config() {
    let ok = r#"
version: 1
checker:
  engine_program: /opt/c7n/bin/custodian
  aws_profile: moto
  default_region: us-east-1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    let engine = config::engine_for(&cfg.checker);
    assert_eq!(engine.program(), "/opt/c7n/bin/custodian");
}
