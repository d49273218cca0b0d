//! Tool registry
//!
//! The closed set of tools this server exposes. Adding a [`ToolKind`]
//! variant forces every `match` over it (descriptor, dispatch) to be updated.

use osmos_common::ToolDescriptor;
use serde_json::{json, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    RunTest,
    GetResults,
    ListTests,
    GetConfig,
    GenerateReport,
    ListPageObjects,
    AnalyzeLogs,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::RunTest,
        ToolKind::GetResults,
        ToolKind::ListTests,
        ToolKind::GetConfig,
        ToolKind::GenerateReport,
        ToolKind::ListPageObjects,
        ToolKind::AnalyzeLogs,
    ];

    /// Wire name of the tool
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::RunTest => "run_playwright_test",
            ToolKind::GetResults => "get_test_results",
            ToolKind::ListTests => "list_test_files",
            ToolKind::GetConfig => "get_test_config",
            ToolKind::GenerateReport => "generate_allure_report",
            ToolKind::ListPageObjects => "get_page_objects",
            ToolKind::AnalyzeLogs => "analyze_test_logs",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::RunTest => {
                "Run Playwright tests with various options (smoke, regression, debug, headed mode)"
            }
            ToolKind::GetResults => {
                "Get the latest test execution results from allure-results or test-results"
            }
            ToolKind::ListTests => "List all test files in the project",
            ToolKind::GetConfig => "Get Playwright configuration details",
            ToolKind::GenerateReport => "Generate and view Allure test report",
            ToolKind::ListPageObjects => "List all page object files",
            ToolKind::AnalyzeLogs => "Analyze test execution logs for errors and failures",
        }
    }

    pub fn input_schema(&self) -> Value {
        match self {
            ToolKind::RunTest => json!({
                "type": "object",
                "properties": {
                    "testType": {
                        "type": "string",
                        "enum": ["all", "smoke", "regression", "specific"],
                        "description": "Type of test to run"
                    },
                    "testPath": {
                        "type": "string",
                        "description": "Specific test file path (relative to tests folder)"
                    },
                    "headed": {
                        "type": "boolean",
                        "description": "Run tests in headed mode",
                        "default": false
                    },
                    "debug": {
                        "type": "boolean",
                        "description": "Run tests in debug mode",
                        "default": false
                    }
                },
                "required": ["testType"]
            }),
            ToolKind::GetResults => json!({
                "type": "object",
                "properties": {
                    "resultType": {
                        "type": "string",
                        "enum": ["allure", "playwright"],
                        "description": "Type of results to retrieve",
                        "default": "allure"
                    }
                }
            }),
            ToolKind::ListTests => json!({
                "type": "object",
                "properties": {
                    "folder": {
                        "type": "string",
                        "description": "Specific folder to list (e.g., 'login', 'smoke')"
                    }
                }
            }),
            ToolKind::GetConfig | ToolKind::ListPageObjects => json!({
                "type": "object",
                "properties": {}
            }),
            ToolKind::GenerateReport => json!({
                "type": "object",
                "properties": {
                    "open": {
                        "type": "boolean",
                        "description": "Open the report in browser after generation",
                        "default": true
                    }
                }
            }),
            ToolKind::AnalyzeLogs => json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Number of recent log entries to analyze",
                        "default": 50
                    }
                }
            }),
        }
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every tool descriptor, in registry order
pub fn list_tools() -> Vec<ToolDescriptor> {
    ToolKind::ALL.iter().map(ToolKind::descriptor).collect()
}
