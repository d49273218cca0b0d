//! Direct tool invocation, bypassing the stdio transport

use anyhow::{bail, Context, Result};
use clap::Args;
use osmos_common::ToolRequest;
use osmos_mcp::Dispatcher;
use serde_json::Value;

use crate::output::{print_response, OutputFormat};

#[derive(Args)]
pub struct CallArgs {
    /// Tool name, e.g. run_playwright_test
    pub name: String,

    /// Arguments as a JSON object
    #[arg(long = "json")]
    pub json: Option<String>,

    /// Single argument as key=value; the value is read as JSON when it parses
    #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE")]
    pub args: Vec<String>,
}

/// Build the request from `--json` and repeated `--arg` pairs; pairs win
pub fn build_request(args: &CallArgs) -> Result<ToolRequest> {
    let mut request = ToolRequest::new(&args.name);

    if let Some(json) = &args.json {
        let value: Value = serde_json::from_str(json).context("--json is not valid JSON")?;
        if !value.is_object() {
            bail!("--json must be a JSON object");
        }
        request = request.with_arguments(value)?;
    }

    for pair in &args.args {
        let (key, raw) = pair
            .split_once('=')
            .with_context(|| format!("expected KEY=VALUE, got '{}'", pair))?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        request = request.arg(key, value);
    }

    Ok(request)
}

/// Returns whether the tool reported success
pub async fn execute(args: CallArgs, dispatcher: &Dispatcher, format: OutputFormat) -> Result<bool> {
    let request = build_request(&args)?;
    let response = dispatcher.dispatch(&request).await;
    print_response(&response, format);
    Ok(!response.is_error)
}
