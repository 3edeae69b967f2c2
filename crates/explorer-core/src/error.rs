use std::path::PathBuf;

use thiserror::Error;

/// Domain errors produced by lookup, listing, decoding, and clone operations.
///
/// Tool implementations keep these structured until the outermost boundary,
/// where they are rendered into the `"Error: ..."` string convention.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("File '{name}' not found.\nSearched in: {}", searched_display(.searched))]
    NotFound { name: String, searched: Vec<PathBuf> },

    #[error("Failed to read '{}': {reason}", .path.display())]
    ReadFailure { path: PathBuf, reason: String },

    #[error("Invalid or unsupported content in '{}': {reason}", .path.display())]
    InvalidContentType { path: PathBuf, reason: String },

    #[error("Cannot access directory '{}': {reason}", .path.display())]
    DirectoryAccessFailure { path: PathBuf, reason: String },

    #[error("External command '{command}' failed: {reason}")]
    ExternalCommandFailure { command: String, reason: String },
}

impl ExplorerError {
    pub fn read_failure(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ReadFailure {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn directory_access(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DirectoryAccessFailure {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for the binary-content rejection produced by the text decoder.
    pub fn is_invalid_content_type(&self) -> bool {
        matches!(self, Self::InvalidContentType { .. })
    }
}

fn searched_display(searched: &[PathBuf]) -> String {
    if searched.is_empty() {
        return "(no search roots configured)".to_string();
    }
    searched
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
