//! OSMOS MCP server
//!
//! Exposes the Playwright suite's test runs, results, listings and logs as
//! MCP tools over stdio.

pub mod args;
pub mod dispatch;
pub mod fs;
pub mod handlers;
pub mod process;
pub mod protocol;
pub mod registry;
pub mod server;

pub use dispatch::{Dispatcher, ToolCall, ToolContext};
pub use process::{CommandOutput, CommandRunner, CommandSpec, TokioCommandRunner};
pub use registry::{list_tools, ToolKind};
pub use server::McpServer;
