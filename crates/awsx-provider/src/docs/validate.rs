//! Engine validation of extracted documentation examples.

use std::fs;
use std::path::{Path, PathBuf};

use futures_util::stream::{self, StreamExt};
use serde::Deserialize;
use walkdir::WalkDir;

use awsx_core::error::{AwsxError, Result};
use awsx_core::policy::{has_policies_header, wrap_policies_header};

use super::extract::{strip_annotations, ANNOTATION_MARKER};
use crate::engine::{PolicyEngine, RunArgs};

const WITH_HEADER_SUFFIX: &str = "_with_header.yaml";

/// Which files to leave alone and which failures to tolerate.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorRules {
    /// Text that marks a file as something other than a policy
    /// (shell, Kubernetes manifests, CI config).
    #[serde(default = "default_skip_markers")]
    pub skip_markers: Vec<String>,

    #[serde(default = "default_skip_file_names")]
    pub skip_file_names: Vec<String>,

    /// Text that marks an intentional fragment; engine failures are
    /// tolerated for these.
    #[serde(default = "default_fragment_markers")]
    pub fragment_markers: Vec<String>,
}

impl Default for ValidatorRules {
    fn default() -> Self {
        Self {
            skip_markers: default_skip_markers(),
            skip_file_names: default_skip_file_names(),
            fragment_markers: default_fragment_markers(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_skip_markers() -> Vec<String> {
    strings(&[
        "export OCI",
        "repos:",
        "apiVersion: rbac.authorization.k8s.io/v1",
        "helm-values.yaml",
        "image: nginx:1.14.2",
    ])
}

fn default_skip_file_names() -> Vec<String> {
    strings(&["deployment_2.yaml", "policyStructure.yaml"])
}

fn default_fragment_markers() -> Vec<String> {
    strings(&[
        "Get the size of a group",
        "Find expiry from tag contents",
        "http://foo.com?hook-id=123",
        "discard-percent: 20",
        "discard-percent: 25",
    ])
}

impl ValidatorRules {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)
            .map_err(|e| AwsxError::Config(format!("read {} failed: {e}", path.display())))?;
        serde_yaml::from_str(&s).map_err(|e| AwsxError::Config(format!("invalid yaml: {e}")))
    }

    fn skip_reason(&self, path: &Path, text: &str) -> Option<String> {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        if self.skip_file_names.iter().any(|n| *n == name) {
            return Some(format!("file name {name}"));
        }
        self.skip_markers
            .iter()
            .find(|m| text.contains(m.as_str()))
            .map(|m| format!("marker {m:?}"))
    }

    fn is_fragment(&self, text: &str) -> bool {
        self.fragment_markers.iter().any(|m| text.contains(m.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub verdict: Verdict,
}

impl FileResult {
    fn new(path: &Path, verdict: Verdict) -> Self {
        Self { path: path.to_path_buf(), verdict }
    }

    pub fn failed(&self) -> bool {
        matches!(self.verdict, Verdict::Failed(_))
    }
}

/// Per-file results, in completion order.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub results: Vec<FileResult>,
}

impl ValidationReport {
    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.results.iter().filter(|r| r.failed())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Every `*.yml` and `*.yaml` under `folder`, sorted.
///
/// Copies written by the header retry are left out.
pub fn collect_yaml_files(folder: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|x| x == "yml" || x == "yaml"))
        .filter(|p| !p.to_string_lossy().ends_with(WITH_HEADER_SUFFIX))
        .collect();
    files.sort();
    files
}

/// `*.yaml` directly under `folder`, sorted.
pub fn collect_top_level_yaml(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(folder)
        .map_err(|e| AwsxError::BadRequest(format!("read {} failed: {e}", folder.display())))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|x| x == "yaml"))
        .collect();
    files.sort();
    Ok(files)
}

pub fn default_concurrency() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}

fn header_copy_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!("{stem}{WITH_HEADER_SUFFIX}"))
}

/// Validate one file with the engine.
///
/// Annotations are stripped in place first. A file without `policies:` is
/// validated through a `{stem}_with_header.yaml` copy.
pub async fn validate_file(
    engine: &dyn PolicyEngine,
    rules: &ValidatorRules,
    path: &Path,
) -> Result<FileResult> {
    tracing::info!(file = %path.display(), "validating");
    let mut text = match tokio::fs::read_to_string(path).await {
        Ok(t) => t,
        Err(e) => return Ok(FileResult::new(path, Verdict::Failed(format!("read failed: {e}")))),
    };

    if let Some(reason) = rules.skip_reason(path, &text) {
        tracing::debug!(file = %path.display(), %reason, "skipped");
        return Ok(FileResult::new(path, Verdict::Skipped(reason)));
    }

    if text.contains(ANNOTATION_MARKER) {
        text = strip_annotations(&text);
        tokio::fs::write(path, &text)
            .await
            .map_err(|e| AwsxError::Internal(format!("rewrite {} failed: {e}", path.display())))?;
    }

    let target = if has_policies_header(&text) {
        path.to_path_buf()
    } else {
        let copy = header_copy_path(path);
        tokio::fs::write(&copy, wrap_policies_header(&text))
            .await
            .map_err(|e| AwsxError::Internal(format!("write {} failed: {e}", copy.display())))?;
        tracing::debug!(file = %path.display(), copy = %copy.display(), "validating with header");
        copy
    };

    let output = engine.validate(&target, false).await?;
    let verdict = if output.success {
        Verdict::Passed
    } else if rules.is_fragment(&text) {
        Verdict::Skipped("intentional fragment".into())
    } else {
        Verdict::Failed(output.combined())
    };
    Ok(FileResult::new(path, verdict))
}

/// Validate `files` with at most `concurrency` engine processes at a time.
///
/// Stops at the first engine error (typically a missing binary).
pub async fn validate_files(
    engine: &dyn PolicyEngine,
    rules: &ValidatorRules,
    files: Vec<PathBuf>,
    concurrency: usize,
) -> Result<ValidationReport> {
    tracing::info!(count = files.len(), "validating yaml files");
    let outcomes: Vec<Result<FileResult>> = stream::iter(files)
        .map(|p| async move { validate_file(engine, rules, &p).await })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let results = outcomes.into_iter().collect::<Result<Vec<_>>>()?;
    Ok(ValidationReport { results })
}

/// Dry-run every `*.yaml` directly under `folder`.
pub async fn dry_run_files(
    engine: &dyn PolicyEngine,
    folder: &Path,
    state_dir: &str,
    concurrency: usize,
) -> Result<ValidationReport> {
    let files = collect_top_level_yaml(folder)?;
    let run = RunArgs {
        output_dir: state_dir.to_owned(),
        dry_run: true,
        cache_period: None,
        verbose: true,
    };
    tracing::info!(count = files.len(), folder = %folder.display(), "dry-running yaml files");

    let outcomes: Vec<Result<FileResult>> = stream::iter(files)
        .map(|p| {
            let run = &run;
            async move {
                let out = engine.run(&p, run).await?;
                let verdict = if out.success {
                    Verdict::Passed
                } else {
                    Verdict::Failed(out.stderr)
                };
                Ok(FileResult::new(&p, verdict))
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let results = outcomes.into_iter().collect::<Result<Vec<_>>>()?;
    Ok(ValidationReport { results })
}

/// Log every failure; returns the failure count.
pub fn report_failures(report: &ValidationReport) -> usize {
    let failures: Vec<&FileResult> = report.failures().collect();
    if failures.is_empty() {
        tracing::info!(files = report.results.len(), "all files passed validation");
        return 0;
    }
    tracing::error!(count = failures.len(), "file(s) failed validation");
    for f in &failures {
        if let Verdict::Failed(msg) = &f.verdict {
            tracing::error!(file = %f.path.display(), error = %msg.trim_end(), "validation failed");
        }
    }
    failures.len()
}
