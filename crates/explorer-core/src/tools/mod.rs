pub mod executor;
pub mod registry;
pub mod types;

pub use executor::{ToolError, ToolExecutor};
pub use registry::{RegistryError, SharedTool, Tool, ToolRegistry};
pub use types::{FunctionCall, FunctionSchema, ToolCall, ToolResult, ToolSchema};
