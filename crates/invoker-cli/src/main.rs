//! Invoker Report - Maven Invoker results recorder CLI
//!
//! The `invoker-report` command records Maven Invoker integration test
//! reports for a build, the way a CI server would after the build step.
//!
//! ## Commands
//!
//! - `record`: Discover, archive, parse and persist reports for a build
//! - `show`: Print a previously recorded build action

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use invoker_core::{
    register_builtin_steps, BuildAction, BuildContext, FsWorkspace, LogFormat, StepConfig,
    StepRegistry, INVOKER_STEP_ID,
};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "invoker-report")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Maven Invoker report recorder", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record Maven Invoker reports for a build
    Record {
        /// Build workspace containing the reports
        #[arg(short, long, default_value = ".")]
        workspace: PathBuf,

        /// Per-build metadata directory (archive and results are written here)
        #[arg(short, long)]
        build_root: PathBuf,

        /// Report pattern: Ant glob, or `;`/`:`/`,` list of files and directories
        #[arg(short, long, env = "INVOKER_REPORT_PATTERN")]
        pattern: Option<String>,

        /// Base path of per-project build.log files to archive (e.g. target/it/*)
        #[arg(long)]
        build_logs: Option<String>,

        /// Build identifier (generated when omitted)
        #[arg(long)]
        build_id: Option<String>,

        /// Step configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the build action as JSON instead of a summary
        #[arg(long)]
        json_output: bool,
    },

    /// Show a recorded build action
    Show {
        /// Per-build metadata directory
        #[arg(short, long)]
        build_root: PathBuf,

        /// Print the build action as JSON instead of a summary
        #[arg(long)]
        json_output: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let format = if cli.json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    invoker_core::init_tracing(format, level);

    match cli.command {
        Commands::Record {
            workspace,
            build_root,
            pattern,
            build_logs,
            build_id,
            config,
            json_output,
        } => {
            let config = resolve_config(config.as_deref(), pattern, build_logs)?;
            let build_id = build_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            cmd_record(&workspace, &build_root, &build_id, config, json_output)
        }
        Commands::Show {
            build_root,
            json_output,
        } => cmd_show(&build_root, json_output),
    }
}

/// Layer command-line flags over the optional config file.
fn resolve_config(
    path: Option<&Path>,
    pattern: Option<String>,
    build_logs: Option<String>,
) -> Result<StepConfig> {
    let mut config = match path {
        Some(path) => StepConfig::load(path)
            .with_context(|| format!("Failed to load step config {}", path.display()))?,
        None => StepConfig::default(),
    };
    if let Some(pattern) = pattern {
        config.filename_pattern = pattern;
    }
    if build_logs.is_some() {
        config.build_logs = build_logs;
    }
    Ok(config)
}

fn cmd_record(
    workspace: &Path,
    build_root: &Path,
    build_id: &str,
    config: StepConfig,
    json_output: bool,
) -> Result<()> {
    let mut registry = StepRegistry::new();
    register_builtin_steps(&mut registry)?;
    let step = registry.create(INVOKER_STEP_ID, config)?;

    let action = step
        .run(
            &FsWorkspace::new(workspace),
            &BuildContext::new(build_id, build_root),
        )
        .with_context(|| format!("Maven Invoker report step failed for build {build_id}"))?;

    let path = action
        .persist(build_root)
        .context("Failed to persist build action")?;
    info!(path = %path.display(), "build action saved");

    print_action(&action, json_output)
}

fn cmd_show(build_root: &Path, json_output: bool) -> Result<()> {
    let action = BuildAction::load(build_root)
        .with_context(|| format!("No recorded build action in {}", build_root.display()))?;
    print_action(&action, json_output)
}

fn print_action(action: &BuildAction, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(action)?);
        return Ok(());
    }

    let summary = action.summary();
    println!("Build {}: {}", action.build_id, action.filename_pattern);
    for record in &action.results {
        println!(
            "  {:<18} {:<40} {:>8.3}s",
            record.result.as_str(),
            record.project,
            record.time
        );
        if let Some(message) = &record.failure_message {
            println!("      {message}");
        }
    }
    println!(
        "Total: {}, passed: {}, failed: {}, skipped: {}, errors: {} ({:.3}s)",
        summary.total,
        summary.passed,
        summary.failed,
        summary.skipped,
        summary.errors,
        summary.total_time
    );
    if !action.archive.is_complete() {
        println!(
            "Archive incomplete: {} file(s) not copied",
            action.archive.failures.len()
        );
    }
    Ok(())
}
