use std::io::ErrorKind;
use std::sync::Arc;

use async_trait::async_trait;
use explorer_core::{ExplorerError, Tool, ToolError, ToolResult};
use serde_json::json;
use tokio::process::Command;
use tokio::time::timeout;
use url::Url;

use crate::context::ExplorerContext;
use crate::lister;

/// Tool for cloning a git repository into the storage directory
pub struct CloneGithubRepoTool {
    ctx: Arc<ExplorerContext>,
}

impl CloneGithubRepoTool {
    pub fn new(ctx: Arc<ExplorerContext>) -> Self {
        Self { ctx }
    }

    /// Destination directory name: the last path segment of the URL with a
    /// trailing `.git` stripped. Handles both http(s) URLs and scp-style
    /// `git@host:owner/repo.git` remotes.
    fn repo_name_from_url(url: &str) -> Option<String> {
        let trimmed = url.trim_end_matches('/');

        let last_segment = if trimmed.starts_with("git@") {
            trimmed
                .rsplit(|c| c == '/' || c == ':')
                .next()
                .map(|s| s.to_string())?
        } else {
            let parsed = Url::parse(trimmed).ok()?;
            parsed
                .path_segments()?
                .filter(|s| !s.is_empty())
                .last()
                .map(|s| s.to_string())?
        };

        let name = last_segment
            .strip_suffix(".git")
            .unwrap_or(&last_segment)
            .to_string();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    async fn run_clone(&self, url: &str, dest: &std::path::Path) -> Result<(), ExplorerError> {
        let command_display = format!("git clone {}", url);
        log::debug!("Executing: {} {}", command_display, dest.display());

        let clone_timeout = self.ctx.config.clone_timeout;
        let mut command = Command::new("git");
        command.arg("clone").arg(url).arg(dest);

        let output = timeout(clone_timeout, command.output())
            .await
            .map_err(|_| ExplorerError::ExternalCommandFailure {
                command: command_display.clone(),
                reason: format!(
                    "Clone operation timed out after {} seconds",
                    clone_timeout.as_secs()
                ),
            })?
            .map_err(|e| {
                let reason = if e.kind() == ErrorKind::NotFound {
                    "Git is not installed or not in PATH".to_string()
                } else {
                    e.to_string()
                };
                ExplorerError::ExternalCommandFailure {
                    command: command_display.clone(),
                    reason,
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ExplorerError::ExternalCommandFailure {
                command: command_display,
                reason: if stderr.is_empty() {
                    "Unknown git error".to_string()
                } else {
                    stderr
                },
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Tool for CloneGithubRepoTool {
    fn name(&self) -> &str {
        "clone_github_repo"
    }

    fn description(&self) -> &str {
        "Clone a GitHub repository into the storage directory"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "URL of the repository to clone"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError> {
        let url = args["url"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'url' parameter".to_string()))?;

        let url = url.trim();
        if url.is_empty() {
            return Ok(ToolResult::error("Error: Repository URL cannot be empty."));
        }

        log::info!("Cloning repository: {}", url);

        if !url.starts_with("http://") && !url.starts_with("https://") && !url.starts_with("git@")
        {
            return Ok(ToolResult::error(
                "Error: Invalid repository URL format. Must start with http://, https://, or git@",
            ));
        }

        let Some(repo_name) = Self::repo_name_from_url(url) else {
            return Ok(ToolResult::error(
                "Error: Could not extract repository name from URL.",
            ));
        };

        let destination = self.ctx.config.storage_dir.join(&repo_name);
        if destination.exists() {
            log::warn!("Repository already exists at: {}", destination.display());
            return Ok(ToolResult::ok(format!(
                "Warning: Repository '{}' already exists at '{}'.",
                repo_name,
                destination.display()
            )));
        }

        match self.run_clone(url, &destination).await {
            Ok(()) => {
                log::info!("Repository cloned successfully to: {}", destination.display());

                // Refresh the filename cache with the cloned contents.
                let depth = self.ctx.config.default_max_depth;
                if let Err(e) =
                    lister::render_tree(&destination, depth, &self.ctx.cache, false)
                {
                    log::warn!("Failed to list cloned repository: {}", e);
                }

                Ok(ToolResult::ok(format!(
                    "Repository '{}' cloned successfully to '{}'.",
                    url,
                    destination.display()
                )))
            }
            Err(e) => {
                log::error!("Clone failed for '{}': {}", url, e);
                Ok(ToolResult::error(format!("Error: {}", e)))
            }
        }
    }
}
