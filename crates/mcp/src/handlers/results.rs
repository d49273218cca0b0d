use osmos_common::{Result, ToolResponse};
use serde_json::Value;
use std::path::Path;
use tracing::warn;

use crate::args::{GetResultsArgs, ResultType};
use crate::dispatch::ToolContext;
use crate::fs;

/// Render a field the way a result summary shows it; empty and falsy values
/// are left out.
fn summary_field(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(_) | Value::Object(_) => Some(data[key].to_string()),
        _ => None,
    }
}

async fn summarize_file(path: &Path, name: &str) -> Result<String> {
    let content = fs::read_to_string(path).await?;
    let data: Value = serde_json::from_str(&content)?;

    let mut entry = format!("📄 {}\n", name);
    for (key, label) in [("name", "Name"), ("status", "Status"), ("stage", "Stage")] {
        if let Some(value) = summary_field(&data, key) {
            entry.push_str(&format!("   {}: {}\n", label, value));
        }
    }
    entry.push('\n');
    Ok(entry)
}

pub async fn get_results(ctx: &ToolContext, args: GetResultsArgs) -> Result<ToolResponse> {
    let config = &ctx.config;
    let dir = match args.result_type {
        ResultType::Allure => config.allure_results_dir(),
        ResultType::Playwright => config.playwright_results_dir(),
    };

    let entries = match fs::list_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) => {
            return Ok(ToolResponse::error(format!(
                "Error reading test results: {}",
                e
            )))
        }
    };

    let json_files: Vec<_> = entries
        .into_iter()
        .filter(|e| !e.is_dir && e.name.ends_with(".json"))
        .collect();

    let mut summary = format!(
        "Found {} result files in {} results:\n\n",
        json_files.len(),
        args.result_type
    );

    let mut skipped = 0;
    for entry in json_files.iter().take(config.results.max_files) {
        match summarize_file(&entry.path, &entry.name).await {
            Ok(text) => summary.push_str(&text),
            Err(e) => {
                warn!(file = %entry.path.display(), error = %e, "Skipping unreadable result file");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        summary.push_str(&format!(
            "Skipped {} result file(s) that could not be parsed.\n",
            skipped
        ));
    }

    Ok(ToolResponse::text(summary))
}
