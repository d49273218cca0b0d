//! OSMOS CLI - Main Entry Point
//!
//! Lists and invokes the Playwright automation tools locally, through the
//! same dispatcher the MCP server uses.

use anyhow::Context;
use clap::{Parser, Subcommand};
use osmos_common::ProjectConfig;
use osmos_mcp::Dispatcher;
use std::path::PathBuf;

mod commands;
mod output;

use commands::{call, config, tools};

/// OSMOS CLI - Playwright automation tools
#[derive(Parser)]
#[command(name = "osmos")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Root of the Playwright project
    #[arg(short = 'r', long, env = "OSMOS_PROJECT_ROOT", global = true)]
    project_root: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, env = "OSMOS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available tools
    Tools,

    /// Invoke a tool
    Call(call::CallArgs),

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let project = ProjectConfig::discover(cli.project_root.as_deref(), cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Tools => tools::execute(&Dispatcher::from_config(project), cli.format)?,
        Commands::Call(args) => {
            let dispatcher = Dispatcher::from_config(project);
            if !call::execute(args, &dispatcher, cli.format).await? {
                std::process::exit(1);
            }
        }
        Commands::Config(cmd) => config::execute(cmd, &project, cli.config, cli.format)?,
    }

    Ok(())
}
