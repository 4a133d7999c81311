use std::io::Write;
use std::time::Instant;

use axum::extract::{Form, State};
use axum::response::Html;
use serde::Deserialize;
use tempfile::NamedTempFile;

use awsx_core::error::{AwsxError, Result};

use super::{page, CheckerState, HttpError};
use crate::engine::{EngineOutput, RunArgs};

#[derive(Debug, Deserialize)]
pub struct YamlForm {
    #[serde(default)]
    pub yaml_content: String,
}

/// Results shown under the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Parser complaint; empty when the YAML is well formed.
    pub yaml_validation: String,
    pub validation_output: String,
    pub dry_run_output: String,
}

pub async fn form() -> Html<String> {
    Html(page::render("", None))
}

pub async fn check(
    State(state): State<CheckerState>,
    Form(form): Form<YamlForm>,
) -> std::result::Result<Html<String>, HttpError> {
    if form.yaml_content.trim().is_empty() {
        return Err(AwsxError::BadRequest("yaml_content is required".into()).into());
    }
    let report = run_checks(&state, &form.yaml_content).await?;
    Ok(Html(page::render(&form.yaml_content, Some(&report))))
}

/// YAML syntax only; the schema is the engine's business.
pub fn yaml_syntax_error(content: &str) -> Option<String> {
    serde_yaml::from_str::<serde_yaml::Value>(content).err().map(|e| e.to_string())
}

async fn run_checks(state: &CheckerState, content: &str) -> Result<CheckReport> {
    let metrics = state.metrics();
    let yaml_validation = yaml_syntax_error(content).unwrap_or_default();
    let outcome = if yaml_validation.is_empty() { "ok" } else { "error" };
    metrics.checks.inc(&[("stage", "yaml"), ("outcome", outcome)]);

    // removed on drop
    let file = write_submission(content.to_owned()).await?;

    let cfg = state.cfg();
    let engine = state.engine();

    let started = Instant::now();
    let validated = engine.validate(file.path(), cfg.verbose).await;
    let validated = record(state, "validate", started, validated)?;

    let run = RunArgs {
        output_dir: cfg.output_dir.clone(),
        dry_run: cfg.dry_run,
        cache_period: None,
        verbose: cfg.verbose,
    };
    let started = Instant::now();
    let ran = engine.run(file.path(), &run).await;
    let ran = record(state, "run", started, ran)?;

    tracing::info!(
        yaml_ok = yaml_validation.is_empty(),
        validate_ok = validated.success,
        run_ok = ran.success,
        "policy checked"
    );
    Ok(CheckReport {
        yaml_validation,
        validation_output: format!("{}{}", validated.stdout, validated.stderr),
        dry_run_output: format!("{}{}", ran.stdout, ran.stderr),
    })
}

async fn write_submission(content: String) -> Result<NamedTempFile> {
    tokio::task::spawn_blocking(move || -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("awsx-check-")
            .suffix(".yaml")
            .tempfile()
            .map_err(|e| AwsxError::Internal(format!("create temp file failed: {e}")))?;
        file.write_all(content.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| AwsxError::Internal(format!("write temp file failed: {e}")))?;
        Ok(file)
    })
    .await
    .map_err(|e| AwsxError::Internal(format!("temp file task failed: {e}")))?
}

fn record(
    state: &CheckerState,
    stage: &str,
    started: Instant,
    result: Result<EngineOutput>,
) -> Result<EngineOutput> {
    let metrics = state.metrics();
    metrics.engine_duration.observe(&[("stage", stage)], started.elapsed());
    match &result {
        Ok(out) => {
            let outcome = if out.success { "ok" } else { "error" };
            metrics.checks.inc(&[("stage", stage), ("outcome", outcome)]);
        }
        Err(_) => metrics.engine_errors.inc(&[("stage", stage)]),
    }
    result
}
