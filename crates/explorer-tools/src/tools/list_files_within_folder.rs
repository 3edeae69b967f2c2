use std::sync::Arc;

use async_trait::async_trait;
use explorer_core::{ExplorerError, Tool, ToolError, ToolResult};
use serde_json::json;

use crate::context::ExplorerContext;
use crate::lister;
use crate::matcher::{self, MatchKind};

/// Tool for listing the contents of a folder matched by name
pub struct ListFilesWithinFolderTool {
    ctx: Arc<ExplorerContext>,
}

impl ListFilesWithinFolderTool {
    pub fn new(ctx: Arc<ExplorerContext>) -> Self {
        Self { ctx }
    }

    fn list(&self, folder_name: &str) -> Result<String, ExplorerError> {
        let config = &self.ctx.config;
        let roots = config.search_roots();

        let path = matcher::find_in_roots(folder_name, &roots, MatchKind::Directory).map_err(
            |_| {
                ExplorerError::directory_access(
                    folder_name,
                    "No folder matching the name was found in any search path",
                )
            },
        )?;

        lister::render_tree(&path, config.default_max_depth, &self.ctx.cache, false)
    }
}

#[async_trait]
impl Tool for ListFilesWithinFolderTool {
    fn name(&self) -> &str {
        "list_files_within_folder"
    }

    fn description(&self) -> &str {
        "List the files within a folder matched by (possibly partial) name \
         across the search paths"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "folder_name": {
                    "type": "string",
                    "description": "Name of the folder to list (can be partial)"
                }
            },
            "required": ["folder_name"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError> {
        let folder_name = args["folder_name"].as_str().ok_or_else(|| {
            ToolError::InvalidArguments("Missing 'folder_name' parameter".to_string())
        })?;

        let folder_name = folder_name.trim();
        if folder_name.is_empty() {
            return Ok(ToolResult::error("Error: Folder name cannot be empty."));
        }

        match self.list(folder_name) {
            Ok(output) => Ok(ToolResult::ok(output)),
            Err(e) => {
                log::error!("Failed to list folder '{}': {}", folder_name, e);
                Ok(ToolResult::error(format!("Error: {}", e)))
            }
        }
    }
}
