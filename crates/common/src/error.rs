//! Error types for the OSMOS MCP server

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the OSMOS Error
pub type Result<T> = std::result::Result<T, Error>;

/// OSMOS error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{source}, '{}'", .path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' exited with {}", exit_label(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Command '{command}' timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Attach the path an I/O operation was working on.
    pub fn at_path(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Path {
            path: path.into(),
            source,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}
