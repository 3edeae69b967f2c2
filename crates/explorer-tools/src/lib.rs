//! Built-in tools for the filesystem-explorer server.
//!
//! Five tools are exposed to the external agent: read a file, list files,
//! list within a matched folder, clone a repository, and read the most recent
//! upload. They are composed from the fuzzy [`matcher`], the [`lister`], the
//! [`decoder`], and a shared filename [`cache`], all wired together through
//! an [`ExplorerContext`].

pub mod cache;
pub mod context;
pub mod decoder;
mod executor;
pub mod lister;
pub mod matcher;
pub mod tools;

pub use cache::FileNameCache;
pub use context::ExplorerContext;
pub use decoder::{ContentDecoder, PdfTextExtractor, UnsupportedPdfExtractor};
pub use executor::{BuiltinToolExecutor, BUILTIN_TOOL_NAMES};
pub use tools::{
    CloneGithubRepoTool, ListFilesTool, ListFilesWithinFolderTool, ReadFileTool,
    ReadLatestContentTool,
};
