#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use awsx_core::options::RunOptions;
use awsx_core::policy::parse_policy_str;
use awsx_core::region::{RegionCatalog, StaticEnabledRegions};
use awsx_provider::provider::{Awsx, Provider};
use awsx_provider::registry;

const CATALOG: &str = r#"
services:
  sqs: [us-east-1, us-west-2, eu-west-1]
  appsync: [us-east-1, eu-west-1]
"#;

fn provider(enabled: &[&str]) -> Awsx {
    let catalog = RegionCatalog::load_from_str(CATALOG).unwrap();
    let directory = StaticEnabledRegions(enabled.iter().map(|s| s.to_string()).collect());
    Awsx::new(catalog, Box::new(directory)).unwrap()
}

#[test]
fn resources_are_registered_under_the_provider_prefix() {
    let p = provider(&[]);
    assert_eq!(p.resources().keys(), ["awsx.graphql-api", "awsx.sqs"]);
    let sqs = p.resources().get("awsx.sqs").unwrap();
    assert_eq!(sqs.type_info().service, "sqs");
    assert_eq!(p.catalog().resources.get("graphql-api").map(String::as_str), Some("appsync"));
}

#[test]
fn provider_registers_once() {
    let clouds = registry::new_cloud_registry();
    let first = registry::initialize(&clouds, provider(&[])).unwrap();
    assert_eq!(first.name(), "awsx");
    assert!(clouds.contains("awsx"));

    let err = registry::initialize(&clouds, provider(&[])).err().unwrap();
    assert_eq!(err.code().as_str(), "DUPLICATE_REGISTRATION");
    assert_eq!(clouds.len(), 1);
}

#[test]
fn policies_expand_in_region_order() {
    let policies = parse_policy_str(
        r#"
policies:
  - name: queues
    resource: awsx.sqs
  - name: apis
    resource: awsx.graphql-api
"#,
        "inline",
    )
    .unwrap();

    let options = RunOptions {
        output_dir: Some("s3://bucket/runs".into()),
        ..RunOptions::with_regions(["us-west-2", "eu-west-1"])
    };
    let collection = provider(&[]).initialize_policies(&policies, options).unwrap();

    let got: Vec<(&str, &str, Option<&str>)> = collection
        .instances()
        .iter()
        .map(|i| (i.region(), i.name(), i.options.output_dir()))
        .collect();
    assert_eq!(
        got,
        [
            ("eu-west-1", "queues", Some("s3://bucket/runs/eu-west-1")),
            ("eu-west-1", "apis", Some("s3://bucket/runs/eu-west-1")),
            ("us-west-2", "queues", Some("s3://bucket/runs/us-west-2")),
        ]
    );
    assert_eq!(collection.regions(), ["eu-west-1", "us-west-2"]);

    let sessions: Vec<_> = collection.instances().iter().map(|i| Arc::clone(&i.session)).collect();
    assert!(sessions.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn all_regions_come_from_the_directory() {
    let policies = parse_policy_str(
        "policies:\n  - name: apis\n    resource: awsx.graphql-api\n",
        "inline",
    )
    .unwrap();
    let collection = provider(&["eu-west-1", "ap-south-1", "us-east-1"])
        .initialize_policies(&policies, RunOptions::with_regions(["all"]))
        .unwrap();
    assert_eq!(collection.regions(), ["eu-west-1", "us-east-1"]);
}

#[test]
fn unknown_awsx_resource_is_rejected() {
    let policies =
        parse_policy_str("policies:\n  - name: q\n    resource: awsx.queue\n", "inline").unwrap();
    let err = provider(&[])
        .initialize_policies(&policies, RunOptions::with_regions(["us-east-1"]))
        .unwrap_err();
    assert_eq!(err.code().as_str(), "INVALID_POLICY");
}

#[test]
fn initialize_keeps_explicit_region_and_derives_account() {
    let options = RunOptions {
        assume_role: Some("arn:aws:iam::210987654321:role/custodian".into()),
        ..RunOptions::with_regions(["eu-west-1"])
    };
    let out = provider(&[]).initialize(options).unwrap();
    assert_eq!(out.regions, ["eu-west-1"]);
    assert_eq!(out.account_id.as_deref(), Some("210987654321"));

    let session = provider(&[]).session_factory(&out);
    assert_eq!(session.region.as_deref(), Some("eu-west-1"));
    assert_eq!(session.assume_role, out.assume_role);
}

#[test]
fn engine_arguments_are_checked_before_handover() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.yml");
    std::fs::write(&good, "policies:\n  - name: q\n    resource: awsx.sqs\n  - name: e\n    resource: aws.ec2\n").unwrap();
    let bad = dir.path().join("bad.yaml");
    std::fs::write(&bad, "policies:\n  - name: q\n    resource: awsx.queue\n").unwrap();

    let p = provider(&[]);
    let args = |file: &std::path::Path| -> Vec<String> {
        vec![
            "run".into(),
            "-s".into(),
            "out".into(),
            file.display().to_string(),
            "missing.yaml".into(),
        ]
    };

    assert_eq!(p.check_policy_args(&args(&good)).unwrap(), 2);
    let err = p.check_policy_args(&args(&bad)).unwrap_err();
    assert_eq!(err.code().as_str(), "INVALID_POLICY");
    assert!(err.to_string().contains("awsx.queue"));
}
