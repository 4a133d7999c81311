//! Option defaults that depend on the environment.

use awsx_core::error::{AwsxError, Result};
use awsx_core::options::RunOptions;

/// Environment variables consulted for a default region, in order.
const REGION_ENV: [&str; 2] = ["AWS_DEFAULT_REGION", "AWS_REGION"];

/// Apply region, account and tracer defaults.
pub fn apply(mut options: RunOptions, env: &dyn Fn(&str) -> Option<String>) -> Result<RunOptions> {
    default_region(&mut options, env)?;
    default_account_id(&mut options);

    if let Some(tracer) = options.tracer.as_deref() {
        if tracer.starts_with("xray") {
            tracing::info!(%tracer, "xray tracing requested, handled by the engine");
        } else {
            tracing::warn!(%tracer, "unsupported tracer ignored");
        }
    }
    Ok(options)
}

fn default_region(options: &mut RunOptions, env: &dyn Fn(&str) -> Option<String>) -> Result<()> {
    if !options.regions.is_empty() {
        return Ok(());
    }
    let region = REGION_ENV
        .iter()
        .find_map(|k| env(k).filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| {
            AwsxError::Config(
                "no default region set; specify one via AWS_DEFAULT_REGION or --region".into(),
            )
        })?;
    tracing::debug!(%region, "using default region from environment");
    options.regions.push(region);
    Ok(())
}

/// Account id from an assumed role ARN (`arn:aws:iam::<account>:role/...`).
fn default_account_id(options: &mut RunOptions) {
    if options.account_id.is_some() {
        return;
    }
    if let Some(account) = options.assume_role.as_deref().and_then(account_from_arn) {
        options.account_id = Some(account.to_owned());
    }
}

pub fn account_from_arn(arn: &str) -> Option<&str> {
    let mut parts = arn.split(':');
    if parts.next()? != "arn" {
        return None;
    }
    let account = parts.nth(3)?;
    (!account.is_empty() && account.chars().all(|c| c.is_ascii_digit())).then_some(account)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn keeps_explicit_regions() {
        let out = apply(RunOptions::with_regions(["eu-west-1"]), &no_env).unwrap();
        assert_eq!(out.regions, ["eu-west-1"]);
    }

    #[test]
    fn region_from_environment() {
        let env = |k: &str| (k == "AWS_REGION").then(|| "ap-south-1".to_string());
        let out = apply(RunOptions::default(), &env).unwrap();
        assert_eq!(out.regions, ["ap-south-1"]);
    }

    #[test]
    fn missing_region_is_a_config_error() {
        let err = apply(RunOptions::default(), &no_env).unwrap_err();
        assert_eq!(err.code().as_str(), "CONFIG");
    }

    #[test]
    fn account_from_role() {
        assert_eq!(account_from_arn("arn:aws:iam::123456789012:role/audit"), Some("123456789012"));
        assert_eq!(account_from_arn("arn:aws:iam:::role/audit"), None);
        assert_eq!(account_from_arn("not-an-arn"), None);

        let opts = RunOptions {
            assume_role: Some("arn:aws:iam::123456789012:role/audit".into()),
            ..RunOptions::with_regions(["us-east-1"])
        };
        let out = apply(opts, &no_env).unwrap();
        assert_eq!(out.account_id.as_deref(), Some("123456789012"));
    }
}
