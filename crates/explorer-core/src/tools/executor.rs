use async_trait::async_trait;
use thiserror::Error;

use crate::tools::{ToolCall, ToolResult, ToolSchema};

#[derive(Error, Debug, Clone)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Execution failed: {0}")]
    Execution(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

pub type Result<T> = std::result::Result<T, ToolError>;

/// Dispatch seam between the transport and the registered tools.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult>;
    fn list_tools(&self) -> Vec<ToolSchema>;
}
