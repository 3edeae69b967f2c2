use std::sync::Arc;

use async_trait::async_trait;
use explorer_core::{ToolCall, ToolError, ToolExecutor, ToolRegistry, ToolResult, ToolSchema};

use crate::context::ExplorerContext;
use crate::tools::{
    CloneGithubRepoTool, ListFilesTool, ListFilesWithinFolderTool, ReadFileTool,
    ReadLatestContentTool,
};

/// List of all built-in tool names
pub const BUILTIN_TOOL_NAMES: [&str; 5] = [
    "read_file",
    "list_files",
    "list_files_within_folder",
    "clone_github_repo",
    "read_latest_content",
];

/// Built-in tool executor that uses ToolRegistry for dynamic dispatch
pub struct BuiltinToolExecutor {
    registry: ToolRegistry,
}

impl BuiltinToolExecutor {
    /// Creates a new executor with all built-in tools registered against the
    /// shared context.
    pub fn new(ctx: Arc<ExplorerContext>) -> Self {
        let registry = ToolRegistry::new();
        Self::register_builtin_tools(&registry, &ctx);
        Self { registry }
    }

    /// Returns a reference to the internal registry
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    fn register_builtin_tools(registry: &ToolRegistry, ctx: &Arc<ExplorerContext>) {
        let _ = registry.register(ReadFileTool::new(Arc::clone(ctx)));
        let _ = registry.register(ListFilesTool::new(Arc::clone(ctx)));
        let _ = registry.register(ListFilesWithinFolderTool::new(Arc::clone(ctx)));
        let _ = registry.register(CloneGithubRepoTool::new(Arc::clone(ctx)));
        let _ = registry.register(ReadLatestContentTool::new(Arc::clone(ctx)));
    }
}

#[async_trait]
impl ToolExecutor for BuiltinToolExecutor {
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let name = &call.function.name;
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.clone()))?;
        tool.execute(call.function.arguments.clone()).await
    }

    fn list_tools(&self) -> Vec<ToolSchema> {
        self.registry.list_tools()
    }
}
