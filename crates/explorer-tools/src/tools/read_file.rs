use std::sync::Arc;

use async_trait::async_trait;
use explorer_core::{ExplorerError, Tool, ToolError, ToolResult};
use serde_json::json;

use crate::context::ExplorerContext;
use crate::matcher::{self, MatchKind};

/// Tool for reading file contents with fuzzy name matching
pub struct ReadFileTool {
    ctx: Arc<ExplorerContext>,
}

impl ReadFileTool {
    pub fn new(ctx: Arc<ExplorerContext>) -> Self {
        Self { ctx }
    }

    fn read(&self, file_name: &str) -> Result<String, ExplorerError> {
        let roots = self.ctx.config.search_roots();
        let path = matcher::resolve(file_name, &self.ctx.cache, &roots, MatchKind::File)?;
        self.ctx.decoder.decode(&path)
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a file. Supports text files, PDFs, and images; \
         the name may be partial and is matched case-insensitively"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "file_name": {
                    "type": "string",
                    "description": "Name of the file to read (can be partial)"
                }
            },
            "required": ["file_name"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError> {
        let file_name = args["file_name"].as_str().ok_or_else(|| {
            ToolError::InvalidArguments("Missing 'file_name' parameter".to_string())
        })?;

        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Ok(ToolResult::error("Error: File name cannot be empty."));
        }

        log::info!("Reading file: {}", file_name);
        match self.read(file_name) {
            Ok(content) => Ok(ToolResult::ok(content)),
            Err(e) => {
                log::error!("Failed to read '{}': {}", file_name, e);
                Ok(ToolResult::error(format!("Error: {}", e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_core::ExplorerConfig;
    use std::fs;
    use tempfile::TempDir;

    fn context(storage: &TempDir) -> Arc<ExplorerContext> {
        Arc::new(ExplorerContext::new(ExplorerConfig::new(
            storage.path(),
            "/no/such/uploads",
        )))
    }

    #[tokio::test]
    async fn reads_partial_match() {
        let storage = TempDir::new().unwrap();
        fs::write(storage.path().join("meeting-notes.txt"), "agenda").unwrap();

        let tool = ReadFileTool::new(context(&storage));
        let result = tool
            .execute(json!({"file_name": "meeting"}))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.result, "agenda");
    }

    #[tokio::test]
    async fn blank_name_is_rejected_before_matching() {
        let storage = TempDir::new().unwrap();
        let tool = ReadFileTool::new(context(&storage));

        let result = tool.execute(json!({"file_name": "   "})).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.result, "Error: File name cannot be empty.");
    }

    #[tokio::test]
    async fn missing_file_reports_searched_roots() {
        let storage = TempDir::new().unwrap();
        let tool = ReadFileTool::new(context(&storage));

        let result = tool
            .execute(json!({"file_name": "does-not-exist"}))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.result.starts_with("Error:"));
        assert!(result
            .result
            .contains(&storage.path().display().to_string()));
    }

    #[tokio::test]
    async fn missing_parameter_is_invalid_arguments() {
        let storage = TempDir::new().unwrap();
        let tool = ReadFileTool::new(context(&storage));

        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(err.to_string().contains("file_name"));
    }

    #[tokio::test]
    async fn binary_file_is_rejected_with_error_string() {
        let storage = TempDir::new().unwrap();
        fs::write(storage.path().join("blob.dat"), [0u8, 1, 2]).unwrap();

        let tool = ReadFileTool::new(context(&storage));
        let result = tool.execute(json!({"file_name": "blob"})).await.unwrap();

        assert!(!result.success);
        assert!(result.result.contains("null bytes"));
    }
}
