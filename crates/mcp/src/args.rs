//! Typed tool arguments
//!
//! Deserializing into these structs is the only argument validation: fields
//! must be present and of the right type; values are not checked further.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    All,
    Smoke,
    Regression,
    Specific,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTestArgs {
    pub test_type: TestType,
    #[serde(default)]
    pub test_path: Option<String>,
    #[serde(default)]
    pub headed: bool,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    #[default]
    Allure,
    Playwright,
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultType::Allure => write!(f, "allure"),
            ResultType::Playwright => write!(f, "playwright"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetResultsArgs {
    pub result_type: ResultType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListTestsArgs {
    pub folder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenerateReportArgs {
    pub open: bool,
}

impl Default for GenerateReportArgs {
    fn default() -> Self {
        Self { open: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalyzeLogsArgs {
    /// Falls back to the configured default when absent
    pub limit: Option<usize>,
}
