//! Dispatcher
//!
//! Routes a [`ToolRequest`] to its handler and turns every failure into an
//! error-flagged [`ToolResponse`]. Nothing escapes `dispatch`.

use osmos_common::{Error, ProjectConfig, Result, RunLog, ToolDescriptor, ToolRequest, ToolResponse};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::args::{AnalyzeLogsArgs, GenerateReportArgs, GetResultsArgs, ListTestsArgs, RunTestArgs};
use crate::handlers;
use crate::process::{CommandRunner, TokioCommandRunner};
use crate::registry::{self, ToolKind};

/// A tool request whose name and arguments have been validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    RunTest(RunTestArgs),
    GetResults(GetResultsArgs),
    ListTests(ListTestsArgs),
    GetConfig,
    GenerateReport(GenerateReportArgs),
    ListPageObjects,
    AnalyzeLogs(AnalyzeLogsArgs),
}

impl ToolCall {
    pub fn parse(name: &str, arguments: &Map<String, Value>) -> Result<Self> {
        let kind = ToolKind::from_name(name).ok_or_else(|| Error::UnknownTool(name.to_string()))?;

        Ok(match kind {
            ToolKind::RunTest => ToolCall::RunTest(from_arguments(arguments)?),
            ToolKind::GetResults => ToolCall::GetResults(from_arguments(arguments)?),
            ToolKind::ListTests => ToolCall::ListTests(from_arguments(arguments)?),
            ToolKind::GetConfig => ToolCall::GetConfig,
            ToolKind::GenerateReport => ToolCall::GenerateReport(from_arguments(arguments)?),
            ToolKind::ListPageObjects => ToolCall::ListPageObjects,
            ToolKind::AnalyzeLogs => ToolCall::AnalyzeLogs(from_arguments(arguments)?),
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ToolCall::RunTest(_) => ToolKind::RunTest,
            ToolCall::GetResults(_) => ToolKind::GetResults,
            ToolCall::ListTests(_) => ToolKind::ListTests,
            ToolCall::GetConfig => ToolKind::GetConfig,
            ToolCall::GenerateReport(_) => ToolKind::GenerateReport,
            ToolCall::ListPageObjects => ToolKind::ListPageObjects,
            ToolCall::AnalyzeLogs(_) => ToolKind::AnalyzeLogs,
        }
    }
}

fn from_arguments<T: DeserializeOwned>(arguments: &Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(arguments.clone()))
        .map_err(|e| Error::InvalidArguments(e.to_string()))
}

/// What every handler gets to work with
#[derive(Clone)]
pub struct ToolContext {
    pub config: Arc<ProjectConfig>,
    pub runner: Arc<dyn CommandRunner>,
}

impl ToolContext {
    pub fn new(config: ProjectConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            config: Arc::new(config),
            runner,
        }
    }
}

pub struct Dispatcher {
    ctx: ToolContext,
    audit: Option<Arc<RunLog>>,
}

impl Dispatcher {
    pub fn new(config: ProjectConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            ctx: ToolContext::new(config, runner),
            audit: None,
        }
    }

    /// Dispatcher that runs real child processes
    pub fn from_config(config: ProjectConfig) -> Self {
        let runner = TokioCommandRunner::from_config(&config.commands);
        Self::new(config, Arc::new(runner))
    }

    /// Record one audit entry per tool call
    pub fn with_audit(mut self, log: Arc<RunLog>) -> Self {
        self.audit = Some(log);
        self
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.ctx.config
    }

    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        registry::list_tools()
    }

    /// Dispatch a call whose arguments have not been checked to be an object
    pub async fn call(&self, name: &str, arguments: Option<Value>) -> ToolResponse {
        match ToolRequest::new(name).with_arguments(arguments.unwrap_or(Value::Null)) {
            Ok(request) => self.dispatch(&request).await,
            Err(e) => {
                let request = ToolRequest::new(name);
                let response = failure(&request, &e);
                self.record(&request, &response, Duration::ZERO);
                response
            }
        }
    }

    pub async fn dispatch(&self, request: &ToolRequest) -> ToolResponse {
        let start = Instant::now();

        let response = match self.try_dispatch(request).await {
            Ok(response) => response,
            Err(e) => failure(request, &e),
        };

        self.record(request, &response, start.elapsed());
        response
    }

    async fn try_dispatch(&self, request: &ToolRequest) -> Result<ToolResponse> {
        let call = ToolCall::parse(&request.name, &request.arguments)?;
        info!(tool = %call.kind(), "Dispatching tool call");
        debug!(?call, "Parsed arguments");

        let ctx = &self.ctx;
        match call {
            ToolCall::RunTest(args) => handlers::run_test(ctx, args).await,
            ToolCall::GetResults(args) => handlers::get_results(ctx, args).await,
            ToolCall::ListTests(args) => handlers::list_tests(ctx, args).await,
            ToolCall::GetConfig => handlers::get_config(ctx).await,
            ToolCall::GenerateReport(args) => handlers::generate_report(ctx, args).await,
            ToolCall::ListPageObjects => handlers::list_page_objects(ctx).await,
            ToolCall::AnalyzeLogs(args) => handlers::analyze_logs(ctx, args).await,
        }
    }

    fn record(&self, request: &ToolRequest, response: &ToolResponse, elapsed: Duration) {
        let Some(audit) = &self.audit else {
            return;
        };

        let data = json!({
            "tool": request.name,
            "arguments": request.arguments,
            "isError": response.is_error,
            "elapsedMs": elapsed.as_millis() as u64,
        });
        let result = if response.is_error {
            audit.warn("tool call failed", Some(&data))
        } else {
            audit.info("tool call completed", Some(&data))
        };
        if let Err(e) = result {
            warn!(error = %e, "Failed to write audit record");
        }
    }
}

fn failure(request: &ToolRequest, err: &Error) -> ToolResponse {
    warn!(tool = %request.name, error = %err, "Tool call failed");
    ToolResponse::error(format!("Error executing {}: {}", request.name, err))
}
