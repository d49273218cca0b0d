//! Drives the stdio server loop end to end over in-memory pipes

use osmos_common::ProjectConfig;
use osmos_mcp::{Dispatcher, McpServer};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

async fn exchange(root: &Path, messages: &[&str]) -> Vec<Value> {
    let server = McpServer::new(Dispatcher::from_config(ProjectConfig::for_root(root)));
    let input = messages.join("\n") + "\n";
    let mut output = Vec::new();

    server.serve(input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_session() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "tests/login/login.spec.js", "");
    write(tmp.path(), "logs/test-2026-03-01.log", "{\"level\":\"INFO\"}\n");

    let replies = exchange(
        tmp.path(),
        &[
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"0"}}}"#,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"list_test_files","arguments":{}}}"#,
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"analyze_test_logs","arguments":{"limit":1}}}"#,
        ],
    )
    .await;

    // The notification produces no line
    assert_eq!(replies.len(), 4);

    assert_eq!(replies[0]["id"], 1);
    assert_eq!(replies[0]["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(replies[0]["result"]["serverInfo"]["name"], "osmos-playwright-automation");

    let tools = replies[1]["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "run_playwright_test",
            "get_test_results",
            "list_test_files",
            "get_test_config",
            "generate_allure_report",
            "get_page_objects",
            "analyze_test_logs",
        ]
    );
    assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));

    assert_eq!(
        replies[2]["result"],
        json!({
            "content": [{"type": "text", "text": "Test files found:\n\n📝 tests/login/login.spec.js"}],
            "isError": false
        })
    );

    assert_eq!(
        replies[3]["result"]["content"][0]["text"],
        "Recent 1 log entries from test-2026-03-01.log:\n\n{\"level\":\"INFO\"}"
    );
}

#[tokio::test]
async fn test_failures_stay_inside_the_protocol() {
    let tmp = TempDir::new().unwrap();

    let replies = exchange(
        tmp.path(),
        &[
            "this is not json",
            r#"{"jsonrpc":"2.0","id":10,"method":"tools/call","params":{"name":"format_disk","arguments":{}}}"#,
            r#"{"jsonrpc":"2.0","id":11,"method":"tools/call","params":{"name":"get_test_config"}}"#,
            "",
            r#"{"jsonrpc":"2.0","id":12,"method":"prompts/list"}"#,
        ],
    )
    .await;

    assert_eq!(replies.len(), 4);

    assert_eq!(replies[0]["id"], Value::Null);
    assert_eq!(replies[0]["error"]["code"], -32700);

    assert_eq!(replies[1]["id"], 10);
    assert_eq!(replies[1]["result"]["isError"], true);
    assert_eq!(
        replies[1]["result"]["content"][0]["text"],
        "Error executing format_disk: Unknown tool: format_disk"
    );

    assert_eq!(replies[2]["result"]["isError"], true);
    assert!(replies[2]["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Error reading config: "));

    assert_eq!(replies[3]["error"]["code"], -32601);
}
