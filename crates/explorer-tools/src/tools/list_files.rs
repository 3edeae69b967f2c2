use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use explorer_core::{ExplorerError, Tool, ToolError, ToolResult};
use serde_json::json;

use crate::context::ExplorerContext;
use crate::lister;
use crate::matcher::{self, MatchKind};

/// Tool for listing files in the configured roots or an arbitrary directory
pub struct ListFilesTool {
    ctx: Arc<ExplorerContext>,
}

impl ListFilesTool {
    pub fn new(ctx: Arc<ExplorerContext>) -> Self {
        Self { ctx }
    }

    /// Expand a leading `~` and resolve relative paths against the process
    /// working directory.
    fn literal_path(directory: &str) -> Result<PathBuf, ExplorerError> {
        let expanded = if directory == "~" {
            dirs::home_dir().unwrap_or_else(|| PathBuf::from(directory))
        } else if let Some(rest) = directory.strip_prefix("~/") {
            dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(directory))
        } else {
            PathBuf::from(directory)
        };

        if expanded.is_absolute() {
            Ok(expanded)
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(expanded))
                .map_err(|e| ExplorerError::directory_access(directory, e.to_string()))
        }
    }

    /// Resolve the argument to a directory: fuzzy match across the search
    /// roots first, falling back to treating it as a literal path.
    fn resolve_directory(&self, directory: &str) -> Result<PathBuf, ExplorerError> {
        let roots = self.ctx.config.search_roots();
        match matcher::find_in_roots(directory, &roots, MatchKind::Directory) {
            Ok(path) => Ok(path),
            Err(_) => Self::literal_path(directory),
        }
    }

    fn list(&self, directory: &str) -> Result<String, ExplorerError> {
        let config = &self.ctx.config;
        let depth = config.default_max_depth;

        if directory.is_empty() || directory == "." {
            let mut output = String::from("=== Storage Folder ===\n");
            match lister::render_tree(&config.storage_dir, depth, &self.ctx.cache, true) {
                Ok(tree) => output.push_str(&tree),
                Err(e) => {
                    log::warn!("Storage directory not accessible: {}", e);
                    output.push_str(&format!("Error: {}\n", e));
                }
            }

            if config.upload_dir.exists() {
                output.push_str("\n=== Uploaded Files ===\n");
                match lister::render_tree(&config.upload_dir, depth, &self.ctx.cache, false) {
                    Ok(tree) => output.push_str(&tree),
                    Err(e) => {
                        log::warn!("Upload directory not accessible: {}", e);
                        output.push_str(&format!("Error: {}\n", e));
                    }
                }
            }

            return Ok(output);
        }

        let target = self.resolve_directory(directory)?;
        let annotate = target == config.storage_dir;
        lister::render_tree(&target, depth, &self.ctx.cache, annotate)
    }
}

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List the files in a directory. Use \".\" or leave empty for the \
         default storage and upload paths"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "Directory to list; \".\" or empty for the defaults"
                }
            }
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError> {
        let directory = args
            .get("directory")
            .and_then(|v| v.as_str())
            .unwrap_or(".")
            .trim()
            .to_string();

        match self.list(&directory) {
            Ok(output) => {
                log::info!("Listed files in '{}'", directory);
                Ok(ToolResult::ok(output))
            }
            Err(e) => {
                log::error!("Failed to list '{}': {}", directory, e);
                Ok(ToolResult::error(format!("Error: {}", e)))
            }
        }
    }
}
