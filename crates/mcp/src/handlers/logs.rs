use osmos_common::{LogSelection, Result, ToolResponse};
use tracing::debug;

use crate::args::AnalyzeLogsArgs;
use crate::dispatch::ToolContext;
use crate::fs::{self, DirEntryInfo};

/// The last `limit` lines of `content`, in their original order
pub fn tail_lines(content: &str, limit: usize) -> Vec<&str> {
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(limit);
    lines[start..].to_vec()
}

async fn most_recent(logs: Vec<DirEntryInfo>, selection: LogSelection) -> Result<Option<DirEntryInfo>> {
    match selection {
        LogSelection::Name => Ok(logs.into_iter().max_by(|a, b| a.name.cmp(&b.name))),
        LogSelection::Modified => {
            let mut newest: Option<(std::time::SystemTime, DirEntryInfo)> = None;
            for entry in logs {
                let modified = fs::modified(&entry.path).await?;
                let newer = match &newest {
                    Some((time, current)) => {
                        (modified, &entry.name) > (*time, &current.name)
                    }
                    None => true,
                };
                if newer {
                    newest = Some((modified, entry));
                }
            }
            Ok(newest.map(|(_, entry)| entry))
        }
    }
}

async fn read_tail(ctx: &ToolContext, limit: usize) -> Result<ToolResponse> {
    let config = &ctx.config;
    let entries = fs::list_dir(&config.logs_dir()).await?;
    let logs: Vec<_> = entries
        .into_iter()
        .filter(|e| !e.is_dir && e.name.ends_with(".log"))
        .collect();

    let Some(log) = most_recent(logs, config.logs.selection).await? else {
        return Ok(ToolResponse::text("No log files found."));
    };
    debug!(file = %log.path.display(), limit, "Reading log tail");

    let content = fs::read_to_string(&log.path).await?;
    let lines = tail_lines(&content, limit);

    Ok(ToolResponse::text(format!(
        "Recent {} log entries from {}:\n\n{}",
        limit,
        log.name,
        lines.join("\n")
    )))
}

pub async fn analyze_logs(ctx: &ToolContext, args: AnalyzeLogsArgs) -> Result<ToolResponse> {
    let limit = args.limit.unwrap_or(ctx.config.logs.default_limit);

    match read_tail(ctx, limit).await {
        Ok(response) => Ok(response),
        Err(e) => Ok(ToolResponse::error(format!("Error analyzing logs: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{project, write, RecordingRunner};
    use osmos_common::ProjectConfig;
    use std::sync::Arc;

    fn ctx(config: ProjectConfig) -> ToolContext {
        ToolContext::new(config, Arc::new(RecordingRunner::default()))
    }

    fn numbered_lines(n: usize) -> String {
        (1..=n).map(|i| format!("line {}\n", i)).collect()
    }

    #[test]
    fn test_tail_lines() {
        let content = numbered_lines(20);
        assert_eq!(
            tail_lines(&content, 5),
            vec!["line 16", "line 17", "line 18", "line 19", "line 20"]
        );
        assert_eq!(tail_lines(&content, 100).len(), 20);
        assert!(tail_lines(&content, 0).is_empty());
        assert!(tail_lines("", 5).is_empty());
    }

    #[tokio::test]
    async fn test_tails_latest_log_by_name() {
        let (tmp, config) = project();
        write(tmp.path(), "logs/test-2026-01-01.log", "old entry\n");
        write(tmp.path(), "logs/test-2026-01-02.log", &numbered_lines(20));
        write(tmp.path(), "logs/notes.txt", "not a log\n");
        write(tmp.path(), "logs/mcp/mcp-2026-12-31.log", "audit\n");

        let resp = analyze_logs(&ctx(config), AnalyzeLogsArgs { limit: Some(5) })
            .await
            .unwrap();
        assert!(!resp.is_error);
        assert_eq!(
            resp.text_content(),
            "Recent 5 log entries from test-2026-01-02.log:\n\nline 16\nline 17\nline 18\nline 19\nline 20"
        );
    }

    #[tokio::test]
    async fn test_default_limit() {
        let (tmp, config) = project();
        write(tmp.path(), "logs/test-2026-01-02.log", &numbered_lines(80));

        let resp = analyze_logs(&ctx(config), AnalyzeLogsArgs::default())
            .await
            .unwrap();
        let text = resp.text_content();
        assert!(text.starts_with("Recent 50 log entries from test-2026-01-02.log:\n\nline 31\n"));
        assert!(text.ends_with("line 80"));
    }

    #[tokio::test]
    async fn test_selects_by_modification_time() {
        let (tmp, mut config) = project();
        config.logs.selection = LogSelection::Modified;
        write(tmp.path(), "logs/zz-archive.log", "archived\n");
        write(tmp.path(), "logs/aa-current.log", "fresh\n");

        let old = std::time::SystemTime::now() - std::time::Duration::from_secs(3600);
        let archive = std::fs::File::options()
            .write(true)
            .open(tmp.path().join("logs/zz-archive.log"))
            .unwrap();
        archive.set_modified(old).unwrap();

        let resp = analyze_logs(&ctx(config), AnalyzeLogsArgs { limit: Some(10) })
            .await
            .unwrap();
        assert!(resp.text_content().contains("from aa-current.log"));
        assert!(resp.text_content().ends_with("fresh"));
    }

    #[tokio::test]
    async fn test_no_log_files() {
        let (tmp, config) = project();
        write(tmp.path(), "logs/readme.txt", "");

        let resp = analyze_logs(&ctx(config), AnalyzeLogsArgs::default())
            .await
            .unwrap();
        assert!(!resp.is_error);
        assert_eq!(resp.text_content(), "No log files found.");
    }

    #[tokio::test]
    async fn test_missing_logs_dir_is_error() {
        let (_tmp, config) = project();

        let resp = analyze_logs(&ctx(config), AnalyzeLogsArgs::default())
            .await
            .unwrap();
        assert!(resp.is_error);
        assert!(resp.text_content().starts_with("Error analyzing logs: "));
    }
}
