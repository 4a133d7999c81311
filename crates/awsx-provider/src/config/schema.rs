use serde::Deserialize;

use awsx_core::error::{AwsxError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckerConfig {
    pub version: u32,

    #[serde(default)]
    pub checker: CheckerSection,
}

impl CheckerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(AwsxError::Config(format!(
                "unsupported config version {} (expected 1)",
                self.version
            )));
        }
        self.checker.validate()
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self { version: 1, checker: CheckerSection::default() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_engine_program")]
    pub engine_program: String,

    /// Exported as `AWS_PROFILE` to the engine.
    #[serde(default)]
    pub aws_profile: Option<String>,

    /// Exported as `AWS_DEFAULT_REGION` to the engine.
    #[serde(default)]
    pub default_region: Option<String>,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Pass `--dry-run` to the engine's run step.
    #[serde(default = "default_true")]
    pub dry_run: bool,

    #[serde(default = "default_true")]
    pub verbose: bool,
}

impl Default for CheckerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            engine_program: default_engine_program(),
            aws_profile: None,
            default_region: None,
            output_dir: default_output_dir(),
            dry_run: true,
            verbose: true,
        }
    }
}

impl CheckerSection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(AwsxError::Config(format!(
                "checker.listen must be a socket address, got {:?}",
                self.listen
            )));
        }
        if self.engine_program.trim().is_empty() {
            return Err(AwsxError::Config("checker.engine_program must not be empty".into()));
        }
        if self.output_dir.trim().is_empty() {
            return Err(AwsxError::Config("checker.output_dir must not be empty".into()));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "127.0.0.1:8000".into()
}
fn default_engine_program() -> String {
    "custodian".into()
}
fn default_output_dir() -> String {
    "logs".into()
}
fn default_true() -> bool {
    true
}
