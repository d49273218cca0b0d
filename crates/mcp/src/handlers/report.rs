use osmos_common::config::CommandsConfig;
use osmos_common::{Result, ToolResponse};
use tracing::info;

use super::failure_detail;
use crate::args::GenerateReportArgs;
use crate::dispatch::ToolContext;
use crate::process::CommandSpec;

pub fn resolve_report_command(commands: &CommandsConfig, args: &GenerateReportArgs) -> CommandSpec {
    let script = if args.open {
        &commands.allure_report_script
    } else {
        &commands.allure_generate_script
    };
    CommandSpec::npm_script(&commands.npm, script)
}

pub async fn generate_report(ctx: &ToolContext, args: GenerateReportArgs) -> Result<ToolResponse> {
    let spec = resolve_report_command(&ctx.config.commands, &args);
    info!(command = %spec, "Generating Allure report");

    match ctx.runner.run(&spec, &ctx.config.project_root).await {
        Ok(output) => Ok(ToolResponse::text(format!(
            "Allure report generated successfully!\n\n{}",
            output.stdout
        ))),
        Err(e) => Ok(ToolResponse::error(format!(
            "Error generating Allure report: {}",
            failure_detail(&e)
        ))),
    }
}
