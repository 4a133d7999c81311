//! Host policy engine seam.
//!
//! Everything that shells out to `custodian` goes through [`PolicyEngine`],
//! so the docs checkers and the web validator can be tested against a fake.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;

use awsx_core::error::{AwsxError, Result};

/// Captured result of one engine invocation.
///
/// A non-zero exit is a normal outcome here, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl EngineOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self { success: true, exit_code: Some(0), stdout: stdout.into(), stderr: String::new() }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self { success: false, exit_code: Some(code), stdout: String::new(), stderr: stderr.into() }
    }

    /// Stdout followed by stderr, for reports.
    pub fn combined(&self) -> String {
        match (self.stdout.trim().is_empty(), self.stderr.trim().is_empty()) {
            (true, _) => self.stderr.clone(),
            (false, true) => self.stdout.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }
}

/// Arguments for `custodian run`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunArgs {
    pub output_dir: String,
    pub dry_run: bool,
    pub cache_period: Option<u32>,
    pub verbose: bool,
}

/// Engine paths use forward slashes on every platform.
fn engine_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

pub fn validate_args(path: &Path, verbose: bool) -> Vec<String> {
    let mut args = vec!["validate".to_string()];
    if verbose {
        args.push("--verbose".into());
    }
    args.push(engine_path(path));
    args
}

pub fn run_args(path: &Path, run: &RunArgs) -> Vec<String> {
    let mut args = vec!["run".to_string(), "-s".into(), run.output_dir.replace('\\', "/")];
    if run.dry_run {
        args.push("--dry-run".into());
    }
    if let Some(period) = run.cache_period {
        args.push("--cache-period".into());
        args.push(period.to_string());
    }
    if run.verbose {
        args.push("--verbose".into());
    }
    args.push(engine_path(path));
    args
}

#[async_trait]
pub trait PolicyEngine: Send + Sync {
    /// Run the engine with `args` and capture its output.
    async fn exec(&self, args: Vec<String>) -> Result<EngineOutput>;

    async fn validate(&self, path: &Path, verbose: bool) -> Result<EngineOutput> {
        self.exec(validate_args(path, verbose)).await
    }

    async fn run(&self, path: &Path, run: &RunArgs) -> Result<EngineOutput> {
        self.exec(run_args(path, run)).await
    }
}

/// The `custodian` command line.
#[derive(Debug, Clone)]
pub struct CustodianCli {
    program: String,
    env: BTreeMap<String, String>,
}

impl Default for CustodianCli {
    fn default() -> Self {
        Self::new("custodian")
    }
}

impl CustodianCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), env: BTreeMap::new() }
    }

    /// Extra environment for every invocation (`AWS_PROFILE`, ...).
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, args: &[String]) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(args).envs(&self.env);
        cmd
    }

    /// Run with inherited stdio and return the exit code.
    pub async fn delegate(&self, args: &[String]) -> Result<i32> {
        tracing::info!(program = %self.program, ?args, "delegating to engine");
        let status = self
            .command(args)
            .status()
            .await
            .map_err(|e| AwsxError::Engine(format!("failed to start {}: {e}", self.program)))?;
        Ok(status.code().unwrap_or(1))
    }
}

#[async_trait]
impl PolicyEngine for CustodianCli {
    async fn exec(&self, args: Vec<String>) -> Result<EngineOutput> {
        tracing::debug!(program = %self.program, ?args, "engine exec");
        let output = self
            .command(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| AwsxError::Engine(format!("failed to start {}: {e}", self.program)))?;

        Ok(EngineOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
