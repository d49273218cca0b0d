use osmos_common::{Result, ToolResponse};
use std::path::Path;

use crate::args::ListTestsArgs;
use crate::dispatch::ToolContext;
use crate::fs;

/// Files under `dir` whose names end with one of `suffixes`
async fn matching_files(root: &Path, dir: &Path, suffixes: &[String]) -> Result<Vec<String>> {
    let files = fs::walk_files(root, dir).await?;
    Ok(files
        .into_iter()
        .filter(|f| suffixes.iter().any(|s| f.ends_with(s.as_str())))
        .collect())
}

fn bullet_list(marker: &str, files: &[String]) -> String {
    files
        .iter()
        .map(|f| format!("{} {}", marker, f))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn list_tests(ctx: &ToolContext, args: ListTestsArgs) -> Result<ToolResponse> {
    let config = &ctx.config;
    let listed = match fs::scoped_dir(&config.tests_dir(), args.folder.as_deref()) {
        Ok(dir) => matching_files(&config.project_root, &dir, &config.listing.test_suffixes).await,
        Err(e) => Err(e),
    };

    match listed {
        Ok(files) => Ok(ToolResponse::text(format!(
            "Test files found:\n\n{}",
            bullet_list("📝", &files)
        ))),
        Err(e) => Ok(ToolResponse::error(format!("Error listing test files: {}", e))),
    }
}

pub async fn list_page_objects(ctx: &ToolContext) -> Result<ToolResponse> {
    let config = &ctx.config;
    let listed = matching_files(
        &config.project_root,
        &config.pages_dir(),
        &config.listing.page_object_suffixes,
    )
    .await;

    match listed {
        Ok(files) => Ok(ToolResponse::text(format!(
            "Page Object files:\n\n{}",
            bullet_list("📄", &files)
        ))),
        Err(e) => Ok(ToolResponse::error(format!("Error listing page objects: {}", e))),
    }
}
