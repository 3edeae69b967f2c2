//! Core abstractions for the filesystem-explorer tool server.
//!
//! This crate defines the `Tool` trait and registry used by every built-in
//! tool, the domain error taxonomy, and the runtime configuration shared by
//! the tool implementations and the serving shell.

pub mod config;
pub mod error;
pub mod tools;

pub use config::{ExplorerConfig, RESERVED_NAMES};
pub use error::ExplorerError;
pub use tools::{
    FunctionCall, FunctionSchema, Tool, ToolCall, ToolError, ToolExecutor, ToolRegistry,
    ToolResult, ToolSchema,
};
