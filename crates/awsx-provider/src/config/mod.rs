//! Web validator config loader (strict parsing).

pub mod schema;

use std::fs;

use awsx_core::error::{AwsxError, Result};

use crate::engine::CustodianCli;

pub use schema::{CheckerConfig, CheckerSection};

pub fn load_from_file(path: &str) -> Result<CheckerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| AwsxError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<CheckerConfig> {
    let cfg: CheckerConfig = serde_yaml::from_str(s)
        .map_err(|e| AwsxError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Engine configured with the section's program and environment.
pub fn engine_for(section: &CheckerSection) -> CustodianCli {
    let mut cli = CustodianCli::new(section.engine_program.clone());
    if let Some(profile) = &section.aws_profile {
        cli = cli.with_env("AWS_PROFILE", profile.clone());
    }
    if let Some(region) = &section.default_region {
        cli = cli.with_env("AWS_DEFAULT_REGION", region.clone());
    }
    cli
}
