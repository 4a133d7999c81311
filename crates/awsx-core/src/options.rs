//! Run options and per-region overrides.
//!
//! Options are built once from invocation arguments. During expansion each
//! policy instance gets a [`RegionOverride`] instead of a full copy; the base
//! options stay shared and read-only behind an `Arc`.

use std::sync::Arc;

/// Symbolic region meaning "every region enabled for the account".
pub const ALL_REGIONS: &str = "all";

/// Region used for global services when no concrete region was given.
pub const DEFAULT_GLOBAL_REGION: &str = "us-east-1";

/// Invocation-wide options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    /// Concrete region names and/or [`ALL_REGIONS`], in the order given.
    /// Treated as a set: repeats are ignored, see [`RunOptions::distinct_regions`].
    pub regions: Vec<String>,
    /// Named credentials profile.
    pub profile: Option<String>,
    /// Role ARN to assume before any API call.
    pub assume_role: Option<String>,
    /// External id passed along with `assume_role`.
    pub external_id: Option<String>,
    /// Inline session policy for the assumed role.
    pub session_policy: Option<String>,
    /// Tracer selector (`xray`, ...).
    pub tracer: Option<String>,
    /// Local directory or blob URL (`s3://bucket/prefix`).
    pub output_dir: Option<String>,
    /// Account id, derived from `assume_role` when not given.
    pub account_id: Option<String>,
    /// Resource cache lifetime in minutes.
    pub cache_period: Option<u32>,
    /// Evaluate filters without running actions.
    pub dry_run: bool,
    /// Verbose engine output.
    pub verbose: bool,
}

impl RunOptions {
    pub fn with_regions<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Requested regions with repeats removed, first occurrence wins.
    pub fn distinct_regions(&self) -> Vec<&str> {
        let mut seen = Vec::with_capacity(self.regions.len());
        for r in &self.regions {
            if !seen.contains(&r.as_str()) {
                seen.push(r.as_str());
            }
        }
        seen
    }

    pub fn wants_all_regions(&self) -> bool {
        self.regions.iter().any(|r| r == ALL_REGIONS)
    }

    /// First concrete region, if any.
    pub fn first_concrete_region(&self) -> Option<&str> {
        self.regions
            .iter()
            .map(String::as_str)
            .find(|r| *r != ALL_REGIONS)
    }

    /// True when one policy may run in more than one region, in which case
    /// outputs are split per region.
    pub fn is_multi_region(&self) -> bool {
        self.wants_all_regions() || self.distinct_regions().len() > 1
    }
}

/// The per-instance part of the options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionOverride {
    pub region: String,
    /// `Some` only when the output location was rewritten for this region.
    pub output_dir: Option<String>,
}

/// Shared base options plus an owned override, read as one.
#[derive(Debug, Clone)]
pub struct ScopedOptions {
    base: Arc<RunOptions>,
    overrides: RegionOverride,
}

impl ScopedOptions {
    pub fn new(base: Arc<RunOptions>, overrides: RegionOverride) -> Self {
        Self { base, overrides }
    }

    /// The concrete region of this instance.
    pub fn region(&self) -> &str {
        &self.overrides.region
    }

    /// Per-region output location, else the base one.
    pub fn output_dir(&self) -> Option<&str> {
        self.overrides
            .output_dir
            .as_deref()
            .or(self.base.output_dir.as_deref())
    }

    /// Options shared by every instance of the run.
    pub fn base(&self) -> &RunOptions {
        &self.base
    }

    pub fn overrides(&self) -> &RegionOverride {
        &self.overrides
    }

    /// Flatten into a standalone value, for callers that need to own it.
    pub fn materialize(&self) -> RunOptions {
        RunOptions {
            regions: vec![self.overrides.region.clone()],
            output_dir: self.output_dir().map(str::to_owned),
            ..(*self.base).clone()
        }
    }
}

/// Join an output location with a path segment.
///
/// Works for both local directories and URLs: a bare scheme (`s3://`) gets
/// the suffix appended directly, anything else gets a single `/` separator.
pub fn join_output(output_dir: &str, suffix: &str) -> String {
    if output_dir.ends_with("://") {
        return format!("{output_dir}{suffix}");
    }
    format!("{}/{suffix}", output_dir.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_output_variants() {
        assert_eq!(join_output("out", "us-east-1"), "out/us-east-1");
        assert_eq!(join_output("out/", "us-east-1"), "out/us-east-1");
        assert_eq!(join_output("s3://", "bucket"), "s3://bucket");
        assert_eq!(
            join_output("s3://bucket/prefix", "eu-west-1"),
            "s3://bucket/prefix/eu-west-1"
        );
    }

    #[test]
    fn first_concrete_skips_all() {
        let o = RunOptions::with_regions(["all", "eu-west-1"]);
        assert!(o.wants_all_regions());
        assert_eq!(o.first_concrete_region(), Some("eu-west-1"));
        assert_eq!(RunOptions::with_regions(["all"]).first_concrete_region(), None);
    }

    #[test]
    fn repeated_regions_count_once() {
        let o = RunOptions::with_regions(["us-east-1", "eu-west-1", "us-east-1"]);
        assert_eq!(o.distinct_regions(), ["us-east-1", "eu-west-1"]);
        assert!(o.is_multi_region());
        assert!(!RunOptions::with_regions(["us-east-1", "us-east-1"]).is_multi_region());
    }

    #[test]
    fn scoped_falls_back_to_base_output() {
        let base = Arc::new(RunOptions {
            output_dir: Some("out".into()),
            ..RunOptions::with_regions(["us-east-1"])
        });
        let scoped = ScopedOptions::new(
            Arc::clone(&base),
            RegionOverride { region: "us-east-1".into(), output_dir: None },
        );
        assert_eq!(scoped.output_dir(), Some("out"));
        assert_eq!(scoped.materialize().regions, vec!["us-east-1".to_string()]);
    }
}
