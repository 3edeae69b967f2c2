use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level entries that never participate in lookups or most-recent scans.
pub const RESERVED_NAMES: [&str; 3] = [".git", ".github", ".DS_Store"];

/// Runtime configuration for the filesystem-explorer server.
///
/// The storage directory is owned by this process and created at startup.
/// The upload directory is owned externally and may legitimately not exist;
/// its existence is polled at call time, never cached.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Local storage root (read/write, mirror destination).
    pub storage_dir: PathBuf,
    /// External upload root (read-only, mirror source).
    pub upload_dir: PathBuf,
    /// Extensions decoded as base64 images.
    pub image_extensions: HashSet<String>,
    /// Number of leading bytes sniffed for binary detection.
    pub binary_sniff_len: usize,
    /// Default recursion depth for directory listings.
    pub default_max_depth: usize,
    /// Timeout for the external git clone command.
    pub clone_timeout: Duration,
}

impl ExplorerConfig {
    pub fn new(storage_dir: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            upload_dir: upload_dir.into(),
            image_extensions: [".png", ".jpg", ".jpeg", ".gif", ".bmp", ".webp", ".svg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            binary_sniff_len: 1024,
            default_max_depth: 100,
            clone_timeout: Duration::from_secs(300),
        }
    }

    /// Ordered search roots: storage first, then the upload directory when it
    /// exists on disk at this moment.
    pub fn search_roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.storage_dir.clone()];
        if self.upload_dir.exists() {
            roots.push(self.upload_dir.clone());
        }
        roots
    }

    /// Create the storage directory if missing. The upload directory is never
    /// created; it belongs to the external upload portal.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        log::debug!("Ensuring storage directory: {}", self.storage_dir.display());
        std::fs::create_dir_all(&self.storage_dir)
    }

    pub fn is_image_file(&self, path: &Path) -> bool {
        let name = path.to_string_lossy().to_lowercase();
        self.image_extensions.iter().any(|ext| name.ends_with(ext))
    }

    pub fn is_pdf_file(&self, path: &Path) -> bool {
        path.to_string_lossy().to_lowercase().ends_with(".pdf")
    }

    pub fn is_reserved_name(name: &str) -> bool {
        RESERVED_NAMES.iter().any(|r| *r == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn search_roots_skip_missing_upload_dir() {
        let storage = TempDir::new().unwrap();
        let config = ExplorerConfig::new(storage.path(), "/definitely/not/a/real/path");
        assert_eq!(config.search_roots(), vec![storage.path().to_path_buf()]);
    }

    #[test]
    fn search_roots_include_upload_dir_when_present() {
        let storage = TempDir::new().unwrap();
        let uploads = TempDir::new().unwrap();
        let config = ExplorerConfig::new(storage.path(), uploads.path());
        let roots = config.search_roots();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0], storage.path());
        assert_eq!(roots[1], uploads.path());
    }

    #[test]
    fn ensure_directories_creates_storage_only() {
        let base = TempDir::new().unwrap();
        let storage = base.path().join("nested").join("storage");
        let uploads = base.path().join("uploads");
        let config = ExplorerConfig::new(&storage, &uploads);
        config.ensure_directories().unwrap();
        assert!(storage.is_dir());
        assert!(!uploads.exists());
    }

    #[test]
    fn file_type_checks_are_case_insensitive() {
        let config = ExplorerConfig::new("/s", "/u");
        assert!(config.is_image_file(Path::new("photo.PNG")));
        assert!(config.is_pdf_file(Path::new("Paper.PDF")));
        assert!(!config.is_image_file(Path::new("notes.txt")));
    }

    #[test]
    fn reserved_names_are_excluded() {
        assert!(ExplorerConfig::is_reserved_name(".git"));
        assert!(ExplorerConfig::is_reserved_name(".DS_Store"));
        assert!(!ExplorerConfig::is_reserved_name("src"));
    }
}
