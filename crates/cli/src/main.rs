//! Prerender CLI - Main Entry Point
//!
//! Runs after a production build: renders each configured route in a
//! headless browser and writes the result back as static HTML.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

use prerender_cli::commands::{config, run, Context};
use prerender_cli::output::print_error;

/// Prerender a built single-page app into static HTML
#[derive(Parser)]
#[command(name = "prerender")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory the config search starts from (default: current directory)
    #[arg(long, global = true)]
    cwd: Option<PathBuf>,

    /// Load this config file instead of searching
    #[arg(long, global = true, env = "PRERENDER_CONFIG")]
    config: Option<PathBuf>,

    /// Do not search for config above this directory
    #[arg(long, global = true, env = "PRERENDER_STOP_DIR")]
    stop_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prerender routes after a build
    Run(run::RunArgs),

    /// Show the resolved prerender configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Prerender failed: {:#}", e);
            print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let cwd = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let ctx = Context {
        cwd,
        config: cli.config,
        stop_dir: cli.stop_dir,
        plain_logs: cli.verbose || cli.log_json,
    };

    match cli.command {
        Commands::Run(args) => {
            run::execute(args, &ctx).await?;
        }
        Commands::Config(args) => config::execute(args, &ctx).await?,
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}
