//! OSMOS Common Library
//!
//! Shared types, configuration and logging for the OSMOS Playwright MCP server.

pub mod config;
pub mod error;
pub mod run_log;
pub mod types;

// Re-export commonly used types
pub use config::{LogSelection, ProjectConfig, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use run_log::{LogLevel, RunLog};
pub use types::*;

/// OSMOS version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name reported to MCP clients
pub const SERVER_NAME: &str = "osmos-playwright-automation";
