//! OSMOS MCP server binary
//!
//! Serves the tool surface over stdin/stdout. Diagnostics go to stderr.

use anyhow::Context;
use clap::Parser;
use osmos_common::{ProjectConfig, RunLog};
use osmos_mcp::{Dispatcher, McpServer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "osmos-mcp")]
#[command(about = "MCP server for the OSMOS Playwright automation suite")]
#[command(version)]
struct Cli {
    /// Root of the Playwright project
    #[arg(short = 'r', long, env = "OSMOS_PROJECT_ROOT")]
    project_root: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, env = "OSMOS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Do not write the tool call audit log
    #[arg(long)]
    no_audit: bool,

    /// Emit diagnostics as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout carries protocol frames only
    let stderr = fmt::layer().with_writer(std::io::stderr).with_ansi(false);
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(stderr.json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry().with(stderr).with(filter).init();
    }

    info!("OSMOS MCP server v{}", osmos_common::VERSION);

    let config = ProjectConfig::discover(cli.project_root.as_deref(), cli.config.as_deref())
        .context("failed to load configuration")?;

    let audit = if config.audit.enabled && !cli.no_audit {
        let log = RunLog::open(config.audit_dir(), &config.audit.prefix)
            .with_context(|| format!("failed to open audit log in {}", config.audit_dir().display()))?;
        Some(Arc::new(log))
    } else {
        None
    };

    let mut dispatcher = Dispatcher::from_config(config);
    if let Some(log) = &audit {
        dispatcher = dispatcher.with_audit(log.clone());
    }
    let server = McpServer::new(dispatcher);

    tokio::select! {
        result = server.run_stdio() => {
            result.context("stdio transport failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    if let Some(log) = audit {
        drop(server);
        match Arc::try_unwrap(log) {
            Ok(log) => log.close().context("failed to close audit log")?,
            Err(log) => log.flush().context("failed to flush audit log")?,
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
