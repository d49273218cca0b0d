//! Process adapter
//!
//! Commands are an explicit program plus argument vector; nothing goes
//! through a shell, so caller-supplied arguments cannot inject commands.

use async_trait::async_trait;
use osmos_common::config::CommandsConfig;
use osmos_common::{Error, Result};
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

/// Program and argument vector of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// `npm run <script>`
    pub fn npm_script(npm: &str, script: &str) -> Self {
        Self::new(npm).arg("run").arg(script)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured output of a command that exited successfully
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

/// Executes commands on behalf of the tool handlers.
///
/// A non-zero exit is reported as [`Error::CommandFailed`], which carries the
/// captured stdout and stderr just like a successful [`CommandOutput`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec, cwd: &Path) -> Result<CommandOutput>;
}

/// Runs commands as Tokio child processes
#[derive(Debug, Clone)]
pub struct TokioCommandRunner {
    max_output_bytes: usize,
    timeout: Option<Duration>,
}

impl TokioCommandRunner {
    pub fn new(max_output_bytes: usize, timeout: Option<Duration>) -> Self {
        Self {
            max_output_bytes,
            timeout,
        }
    }

    pub fn from_config(config: &CommandsConfig) -> Self {
        Self::new(
            config.max_output_bytes,
            config.timeout_secs.map(Duration::from_secs),
        )
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::from_config(&CommandsConfig::default())
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, spec: &CommandSpec, cwd: &Path) -> Result<CommandOutput> {
        let command = spec.to_string();
        debug!(command = %command, cwd = %cwd.display(), "Spawning command");

        // stdin is the protocol channel; the child must never read from it
        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Internal("child stdout was not captured".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Internal("child stderr was not captured".into()))?;

        let cap = self.max_output_bytes;
        let collect = async {
            tokio::try_join!(
                read_capped(stdout, cap),
                read_capped(stderr, cap),
                child.wait()
            )
        };

        let (stdout, stderr, status) = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, collect).await {
                Ok(result) => result?,
                Err(_) => {
                    warn!(command = %command, seconds = limit.as_secs(), "Command timed out");
                    // dropping the child kills it
                    return Err(Error::Timeout {
                        command,
                        seconds: limit.as_secs(),
                    });
                }
            },
            None => collect.await?,
        };

        debug!(command = %command, code = ?status.code(), "Command finished");

        if status.success() {
            Ok(CommandOutput {
                stdout,
                stderr,
                code: status.code(),
            })
        } else {
            Err(Error::CommandFailed {
                command,
                code: status.code(),
                stdout,
                stderr,
            })
        }
    }
}

/// Read a stream to the end, keeping at most `cap` bytes.
///
/// Bytes past the cap are still drained so the child never blocks on a full pipe.
async fn read_capped<R: AsyncRead + Unpin>(mut reader: R, cap: usize) -> std::io::Result<String> {
    let mut kept = Vec::new();
    let mut buf = [0u8; 8192];
    let mut truncated = false;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        let room = cap.saturating_sub(kept.len());
        if n > room {
            truncated = true;
        }
        kept.extend_from_slice(&buf[..n.min(room)]);
    }

    let mut text = String::from_utf8_lossy(&kept).into_owned();
    if truncated {
        text.push_str(&format!("\n[output truncated at {} bytes]", cap));
    }
    Ok(text)
}
