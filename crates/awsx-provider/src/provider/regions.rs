//! Enabled-region lookup through the `aws` CLI.

use std::process::{Command, Stdio};

use awsx_core::error::{AwsxError, Result};
use awsx_core::options::RunOptions;
use awsx_core::region::{EnabledRegions, RegionSet};

/// Runs `aws ec2 describe-regions`, keeping regions whose opt-in status is
/// `opt-in-not-required` or `opted-in`. Blocking.
#[derive(Debug, Clone)]
pub struct AwsCliEnabledRegions {
    program: String,
}

impl Default for AwsCliEnabledRegions {
    fn default() -> Self {
        Self { program: "aws".into() }
    }
}

impl AwsCliEnabledRegions {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    pub fn build_args(options: &RunOptions) -> Vec<String> {
        let mut args: Vec<String> = [
            "ec2",
            "describe-regions",
            "--filters",
            "Name=opt-in-status,Values=opt-in-not-required,opted-in",
            "--query",
            "Regions[].RegionName",
            "--output",
            "json",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        if let Some(profile) = &options.profile {
            args.push("--profile".into());
            args.push(profile.clone());
        }
        if let Some(region) = options.first_concrete_region() {
            args.push("--region".into());
            args.push(region.to_owned());
        }
        args
    }
}

/// Parse the JSON list printed by `--query Regions[].RegionName`.
pub fn parse_region_names(stdout: &str) -> Result<RegionSet> {
    let names: Vec<String> = serde_json::from_str(stdout)
        .map_err(|e| AwsxError::Resolution(format!("unexpected describe-regions output: {e}")))?;
    Ok(names.into_iter().collect())
}

impl EnabledRegions for AwsCliEnabledRegions {
    fn enabled_regions(&self, options: &RunOptions) -> Result<RegionSet> {
        let output = Command::new(&self.program)
            .args(Self::build_args(options))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| AwsxError::Resolution(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            return Err(AwsxError::Resolution(format!(
                "describe-regions failed (exit {}): {}",
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        parse_region_names(&String::from_utf8_lossy(&output.stdout))
    }
}
