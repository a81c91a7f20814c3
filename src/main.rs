mod config;
mod error;
mod models;
mod report;
mod submit;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use config::{Config, GithubContext};
use submit::{Credentials, Payload};

/// Normalize test-runner XML reports and submit the run summary.
#[derive(Parser)]
#[command(name = "tally", version)]
struct Cli {
    /// ServiceNow instance name (`<name>.service-now.com`)
    #[arg(long, env = "INPUT_INSTANCE-NAME")]
    instance_name: String,

    /// Orchestration tool id registered in ServiceNow
    #[arg(long, env = "INPUT_TOOL-ID")]
    tool_id: String,

    #[arg(long = "devops-integration-user-name", env = "INPUT_DEVOPS-INTEGRATION-USER-NAME")]
    username: String,

    #[arg(
        long = "devops-integration-user-password",
        env = "INPUT_DEVOPS-INTEGRATION-USER-PASSWORD",
        hide_env_values = true
    )]
    password: String,

    /// Stage name reported with the summary
    #[arg(long, env = "INPUT_JOB-NAME")]
    job_name: String,

    /// Report file, or a directory of JUnit reports
    #[arg(long = "xml-report-filename", env = "INPUT_XML-REPORT-FILENAME")]
    report: PathBuf,

    /// `${{ toJSON(github) }}`
    #[arg(long = "context-github", env = "INPUT_CONTEXT-GITHUB", hide_env_values = true)]
    github_context: String,

    /// Config file (defaults to ./tally.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the payload instead of submitting it
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            // Surfaces as an annotation on the workflow run.
            println!("::error::{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("TALLY_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_file(path),
        None => {
            let workspace = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Config::load(&workspace)
        }
    };

    let partial = report::normalize(&cli.report)
        .with_context(|| format!("failed to process test report {}", cli.report.display()))?;
    info!(
        name = %partial.name,
        format = ?partial.format,
        total = partial.total,
        passed = partial.passed,
        failed = partial.failed,
        skipped = partial.skipped,
        ignored = partial.ignored,
        duration = partial.duration_seconds,
        "normalized test report"
    );

    let context = GithubContext::parse(&cli.github_context)?;
    let summaries = models::assemble(partial, &context.run_metadata());
    let payload = Payload::new(&cli.tool_id, &cli.job_name, &context, summaries);
    debug!(
        payload = %serde_json::to_string(&payload).context("failed to serialise payload")?,
        "assembled payload"
    );

    let submitter = submit::connect(
        &config.submit,
        &cli.instance_name,
        Credentials::new(cli.username, cli.password),
        cli.dry_run,
    )?;
    submit::deliver(submitter.as_ref(), &payload).await
}
