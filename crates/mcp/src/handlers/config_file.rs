use osmos_common::{Result, ToolResponse};

use crate::dispatch::ToolContext;
use crate::fs;

pub async fn get_config(ctx: &ToolContext) -> Result<ToolResponse> {
    match fs::read_to_string(&ctx.config.config_file()).await {
        Ok(content) => Ok(ToolResponse::text(format!(
            "Playwright Configuration:\n\n{}",
            content
        ))),
        Err(e) => Ok(ToolResponse::error(format!("Error reading config: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{project, write, RecordingRunner};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_returns_raw_contents() {
        let (tmp, config) = project();
        write(
            tmp.path(),
            "playwright.config.js",
            "export default defineConfig({ testDir: './tests' });\n",
        );
        let ctx = ToolContext::new(config, Arc::new(RecordingRunner::default()));

        let resp = get_config(&ctx).await.unwrap();
        assert!(!resp.is_error);
        assert_eq!(
            resp.text_content(),
            "Playwright Configuration:\n\nexport default defineConfig({ testDir: './tests' });\n"
        );
    }

    #[tokio::test]
    async fn test_missing_config_is_error() {
        let (_tmp, config) = project();
        let ctx = ToolContext::new(config, Arc::new(RecordingRunner::default()));

        let resp = get_config(&ctx).await.unwrap();
        assert!(resp.is_error);
        let text = resp.text_content();
        assert!(text.starts_with("Error reading config: "));
        assert!(text.contains("playwright.config.js"));
    }
}
