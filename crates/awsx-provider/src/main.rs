//! `awsx` command line.
//!
//! - `custodian -- <args>` : check `awsx.*` types in the policy files, then hand over to the engine
//! - `lint`                : policy style checks
//! - `expand`              : show the per-region instances a policy file yields
//! - `docs ...`            : extract and validate documentation examples
//! - `serve`               : web validator

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use awsx_core::error::{AwsxError, Result};
use awsx_core::lint::{self, config as lint_config};
use awsx_core::options::RunOptions;
use awsx_core::policy::load_policy_files;
use awsx_core::region::{EnabledRegions, RegionCatalog, StaticEnabledRegions};
use awsx_provider::checker::{self, CheckerState};
use awsx_provider::engine::{CustodianCli, PolicyEngine};
use awsx_provider::provider::{AwsCliEnabledRegions, Awsx, PolicyCollection, Provider};
use awsx_provider::{config, docs, registry};

#[derive(Parser)]
#[command(name = "awsx", about = "Cloud Custodian extras: regions, linting, docs checks")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check awsx resource types, then run the engine
    Custodian(CustodianArgs),
    /// Lint a policy file or inline YAML
    Lint(LintArgs),
    /// Expand policies into per-region instances
    Expand(ExpandArgs),
    /// Documentation example checks
    #[command(subcommand)]
    Docs(DocsCommand),
    /// Serve the web validator
    Serve(ServeArgs),
}

#[derive(Args)]
struct CustodianArgs {
    #[arg(long, default_value = "custodian")]
    program: String,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Args)]
struct LintArgs {
    /// Path to a policy file, or the YAML itself
    input: String,

    /// TOML file with a [rules] table; defaults apply when it is missing
    #[arg(long, default_value = "lint.toml")]
    config: PathBuf,
}

#[derive(Args)]
struct ExpandArgs {
    #[arg(required = true)]
    policies: Vec<PathBuf>,

    /// Target region; repeatable, `all` for every enabled region
    #[arg(short, long = "region")]
    regions: Vec<String>,

    /// Service catalogue (YAML)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Enabled regions to assume for `all` instead of asking the aws CLI
    #[arg(long = "enabled-region")]
    enabled_regions: Vec<String>,

    #[arg(short = 's', long)]
    output_dir: Option<String>,

    #[arg(long)]
    profile: Option<String>,

    #[arg(long)]
    assume_role: Option<String>,

    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum DocsCommand {
    /// Extract YAML blocks from the .rst files of a directory
    ExtractRst { src: PathBuf, dest: PathBuf },
    /// Extract YAML blocks from docstrings of a Python source tree
    ExtractDocstrings { src: PathBuf, dest: PathBuf },
    /// Validate every .yml/.yaml under a folder
    Validate(DocsValidateArgs),
    /// Dry-run every .yaml directly under a folder
    DryRun(DocsDryRunArgs),
}

#[derive(Args)]
struct EngineArgs {
    #[arg(long, default_value = "custodian")]
    program: String,

    #[arg(long)]
    concurrency: Option<usize>,
}

#[derive(Args)]
struct DocsValidateArgs {
    folder: PathBuf,

    /// Skip and fragment rules (YAML)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Exported as AWS_DEFAULT_REGION to the engine
    #[arg(long, default_value = "us-east-1")]
    region: String,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Args)]
struct DocsDryRunArgs {
    folder: PathBuf,

    #[arg(long, default_value = "state")]
    state: String,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Args)]
struct ServeArgs {
    /// Validator config (YAML); built-in defaults when omitted
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Custodian(args) => custodian(args).await,
        Commands::Lint(args) => run_lint(args),
        Commands::Expand(args) => expand(args).await,
        Commands::Docs(cmd) => run_docs(cmd).await,
        Commands::Serve(args) => serve(args).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "awsx failed");
            ExitCode::FAILURE
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

async fn custodian(args: CustodianArgs) -> Result<ExitCode> {
    let clouds = registry::new_cloud_registry();
    let provider = Awsx::new(RegionCatalog::default(), Box::new(AwsCliEnabledRegions::default()))?;
    let provider = registry::initialize(&clouds, provider)?;
    let checked = provider.check_policy_args(&args.args)?;

    tracing::debug!(policies = checked, "policy files checked");
    let code = CustodianCli::new(args.program).delegate(&args.args).await?;
    Ok(exit_code(code))
}

fn run_lint(args: LintArgs) -> Result<ExitCode> {
    let rules = lint_config::load_or_default(&args.config)?;
    let input = lint::read_input(&args.input)?;
    for doc in lint::lint(&input, &rules)? {
        for (rule, passed) in &doc.outcomes {
            println!("document {}: {:<28} {}", doc.index, rule.as_str(), if *passed { "ok" } else { "FAIL" });
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn expand(args: ExpandArgs) -> Result<ExitCode> {
    let policies = load_policy_files(args.policies.as_slice())?;
    let catalog = match &args.catalog {
        Some(path) => RegionCatalog::load_from_file(path)?,
        None => RegionCatalog::default(),
    };
    let directory: Box<dyn EnabledRegions + Send + Sync> = if args.enabled_regions.is_empty() {
        Box::new(AwsCliEnabledRegions::default())
    } else {
        Box::new(StaticEnabledRegions(args.enabled_regions.into_iter().collect()))
    };

    let provider = Awsx::new(catalog, directory)?;
    let options = provider.initialize(RunOptions {
        regions: args.regions,
        output_dir: args.output_dir,
        profile: args.profile,
        assume_role: args.assume_role,
        ..RunOptions::default()
    })?;

    // enabled-region lookup may shell out
    let collection = tokio::task::spawn_blocking(move || provider.initialize_policies(&policies, options))
        .await
        .map_err(|e| AwsxError::Internal(format!("expansion task failed: {e}")))??;

    if args.json {
        println!("{}", expansion_json(&collection));
    } else {
        for i in collection.instances() {
            println!(
                "{:<16} {:<32} {:<20} {}",
                i.region(),
                i.name(),
                i.policy.resource_type,
                i.options.output_dir().unwrap_or("-")
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn expansion_json(collection: &PolicyCollection) -> String {
    let rows: Vec<serde_json::Value> = collection
        .instances()
        .iter()
        .map(|i| {
            serde_json::json!({
                "policy": i.name(),
                "resource": i.policy.resource_type,
                "region": i.region(),
                "output_dir": i.options.output_dir(),
            })
        })
        .collect();
    serde_json::Value::Array(rows).to_string()
}

async fn run_docs(cmd: DocsCommand) -> Result<ExitCode> {
    match cmd {
        DocsCommand::ExtractRst { src, dest } => {
            let written = docs::extract_rst_dir(&src, &dest)?;
            tracing::info!(files = written.len(), "rst extraction done");
            Ok(ExitCode::SUCCESS)
        }
        DocsCommand::ExtractDocstrings { src, dest } => {
            let report = docs::extract_python_tree(&src, &dest);
            tracing::info!(
                files = report.written.len(),
                failed = report.failed.len(),
                "docstring extraction done"
            );
            Ok(if report.failed.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        DocsCommand::Validate(args) => {
            let rules = match &args.rules {
                Some(path) => docs::ValidatorRules::load_from_file(path)?,
                None => docs::ValidatorRules::default(),
            };
            let files = docs::collect_yaml_files(&args.folder);
            if files.is_empty() {
                tracing::info!(folder = %args.folder.display(), "no yaml files found");
                return Ok(ExitCode::SUCCESS);
            }
            let engine = CustodianCli::new(args.engine.program).with_env("AWS_DEFAULT_REGION", args.region);
            let concurrency = args.engine.concurrency.unwrap_or_else(docs::default_concurrency);
            let report = docs::validate_files(&engine, &rules, files, concurrency).await?;
            Ok(verdict(docs::report_failures(&report)))
        }
        DocsCommand::DryRun(args) => {
            let engine = CustodianCli::new(args.engine.program);
            let concurrency = args.engine.concurrency.unwrap_or_else(docs::default_concurrency);
            let report = docs::dry_run_files(&engine, &args.folder, &args.state, concurrency).await?;
            Ok(verdict(docs::report_failures(&report)))
        }
    }
}

fn verdict(failures: usize) -> ExitCode {
    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn serve(args: ServeArgs) -> Result<ExitCode> {
    let cfg = match &args.config {
        Some(path) => config::load_from_file(path)?,
        None => config::CheckerConfig::default(),
    };
    let listen: SocketAddr = cfg
        .checker
        .listen
        .parse()
        .map_err(|e| AwsxError::Config(format!("checker.listen: {e}")))?;

    let engine: Arc<dyn PolicyEngine> = Arc::new(config::engine_for(&cfg.checker));
    let app = checker::build_router(CheckerState::new(cfg.checker, engine));

    tracing::info!(%listen, "awsx checker starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| AwsxError::Internal(format!("bind {listen} failed: {e}")))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| AwsxError::Internal(format!("server failed: {e}")))?;
    Ok(ExitCode::SUCCESS)
}
