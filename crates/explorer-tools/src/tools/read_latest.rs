use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use explorer_core::{ExplorerConfig, ExplorerError, Tool, ToolError, ToolResult};
use serde_json::json;
use walkdir::WalkDir;

use crate::context::ExplorerContext;
use crate::decoder::BINARY_PLACEHOLDER;

/// Tool for reading the most recently modified entry in storage
pub struct ReadLatestContentTool {
    ctx: Arc<ExplorerContext>,
}

impl ReadLatestContentTool {
    pub fn new(ctx: Arc<ExplorerContext>) -> Self {
        Self { ctx }
    }

    /// The immediate child of the storage root with the greatest modification
    /// time, reserved names excluded. Recomputed on every call.
    fn most_recent_entry(&self) -> Result<PathBuf, ExplorerError> {
        let storage = &self.ctx.config.storage_dir;
        let entries = fs::read_dir(storage)
            .map_err(|e| ExplorerError::directory_access(storage, e.to_string()))?;

        let mut best: Option<(SystemTime, PathBuf)> = None;
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if ExplorerConfig::is_reserved_name(&name) {
                continue;
            }
            let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
                continue;
            };
            if best.as_ref().map_or(true, |(t, _)| modified > *t) {
                best = Some((modified, entry.path()));
            }
        }

        if let Some((modified, path)) = &best {
            let stamp: chrono::DateTime<chrono::Utc> = (*modified).into();
            log::debug!(
                "Most recent candidate: {} (modified {})",
                path.display(),
                stamp.to_rfc3339()
            );
        }

        best.map(|(_, path)| path)
            .ok_or_else(|| ExplorerError::NotFound {
                name: "most recent upload".to_string(),
                searched: vec![storage.clone()],
            })
    }

    /// Decode one file for multi-file assembly: binary content becomes a
    /// placeholder, any other failure an inline error line.
    fn decode_inline(&self, path: &Path) -> String {
        match self.ctx.decoder.decode(path) {
            Ok(content) => content,
            Err(e) if e.is_invalid_content_type() => BINARY_PLACEHOLDER.to_string(),
            Err(e) => {
                log::warn!("Failed to decode '{}': {}", path.display(), e);
                format!("Error: {}", e)
            }
        }
    }

    fn read_latest(&self) -> Result<String, ExplorerError> {
        let target = self.most_recent_entry()?;
        log::info!("Most recent storage entry: {}", target.display());

        if target.is_file() {
            let name = target.file_name().unwrap_or_default().to_string_lossy();
            return Ok(format!(
                "=== File: {} ===\n{}\n",
                name,
                self.decode_inline(&target)
            ));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&target)
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git")
            .flatten()
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();

        if files.is_empty() {
            return Ok(format!(
                "Directory '{}' contains no readable files.\n",
                target.display()
            ));
        }

        let mut output = String::new();
        for file in &files {
            let rel = file.strip_prefix(&target).unwrap_or(file);
            output.push_str(&format!(
                "=== File: {} ===\n{}\n\n",
                rel.display(),
                self.decode_inline(file)
            ));
        }
        Ok(output)
    }
}

#[async_trait]
impl Tool for ReadLatestContentTool {
    fn name(&self) -> &str {
        "read_latest_content"
    }

    fn description(&self) -> &str {
        "Read the content of the most recently modified file or directory in \
         the storage folder"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: serde_json::Value) -> Result<ToolResult, ToolError> {
        match self.read_latest() {
            Ok(output) => Ok(ToolResult::ok(output)),
            Err(e) => {
                log::error!("Failed to read latest content: {}", e);
                Ok(ToolResult::error(format!("Error: {}", e)))
            }
        }
    }
}
