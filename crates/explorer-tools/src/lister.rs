use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use explorer_core::{ExplorerConfig, ExplorerError};

use crate::cache::FileNameCache;

/// One visited directory: immediate subdirectory and file names, both sorted
/// lexicographically, or an inline error when the directory could not be
/// read.
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    pub path: PathBuf,
    pub subdirs: Vec<String>,
    pub files: Vec<String>,
    pub error: Option<String>,
}

/// Walk `root` down to `max_depth` levels of subdirectories (0 = root only),
/// building listings in recursion order. Every file name seen is inserted
/// into the shared cache. A missing or non-directory root fails fast; a
/// read failure on a subdirectory becomes an inline error entry and the walk
/// continues with its siblings.
pub fn collect_listings(
    root: &Path,
    max_depth: usize,
    cache: &FileNameCache,
) -> Result<Vec<DirectoryListing>, ExplorerError> {
    if !root.exists() {
        return Err(ExplorerError::directory_access(
            root,
            "Directory does not exist",
        ));
    }
    if !root.is_dir() {
        return Err(ExplorerError::directory_access(
            root,
            "Path is not a directory",
        ));
    }

    let mut listings = Vec::new();
    visit(root, 0, max_depth, cache, &mut listings);
    Ok(listings)
}

fn visit(
    path: &Path,
    depth: usize,
    max_depth: usize,
    cache: &FileNameCache,
    listings: &mut Vec<DirectoryListing>,
) {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Failed to read directory {}: {}", path.display(), e);
            listings.push(DirectoryListing {
                path: path.to_path_buf(),
                subdirs: Vec::new(),
                files: Vec::new(),
                error: Some(e.to_string()),
            });
            return;
        }
    };

    let mut subdirs = Vec::new();
    let mut files = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        match entry.file_type() {
            Ok(ft) if ft.is_dir() => {
                if name != ".git" {
                    subdirs.push(name);
                }
            }
            Ok(ft) if ft.is_file() => {
                cache.insert(name.clone());
                files.push(name);
            }
            _ => {}
        }
    }
    subdirs.sort();
    files.sort();

    listings.push(DirectoryListing {
        path: path.to_path_buf(),
        subdirs: subdirs.clone(),
        files,
        error: None,
    });

    if depth < max_depth {
        for sub in &subdirs {
            visit(&path.join(sub), depth + 1, max_depth, cache, listings);
        }
    }
}

/// The immediate subdirectory of `root` with the greatest modification time,
/// reserved names excluded. Used to annotate the storage-root listing.
pub fn most_recent_subdir(root: &Path) -> Option<String> {
    let entries = fs::read_dir(root).ok()?;
    let mut best: Option<(SystemTime, String)> = None;

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if ExplorerConfig::is_reserved_name(&name) {
            continue;
        }
        let Ok(ft) = entry.file_type() else { continue };
        if !ft.is_dir() {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        if best.as_ref().map_or(true, |(t, _)| modified > *t) {
            best = Some((modified, name));
        }
    }

    best.map(|(_, name)| name)
}

/// Render listings into the textual tree format. `recent_subdir`, when given,
/// annotates that name in the listing of `root` itself; the annotation never
/// changes ordering or recursion.
pub fn format_listings(
    listings: &[DirectoryListing],
    root: &Path,
    recent_subdir: Option<&str>,
) -> String {
    let mut output = String::new();

    for listing in listings {
        output.push_str(&format!("Directory: {}\n", listing.path.display()));

        if let Some(error) = &listing.error {
            output.push_str(&format!("  Error: {}\n\n", error));
            continue;
        }

        if !listing.subdirs.is_empty() {
            let annotate_here = listing.path == root;
            let rendered: Vec<String> = listing
                .subdirs
                .iter()
                .map(|name| {
                    if annotate_here && recent_subdir == Some(name.as_str()) {
                        format!("{} (most recent)", name)
                    } else {
                        name.clone()
                    }
                })
                .collect();
            output.push_str(&format!("  Subdirectories: {}\n", rendered.join(", ")));
        }
        if !listing.files.is_empty() {
            output.push_str(&format!("  Files: {}\n", listing.files.join(", ")));
        }
        output.push('\n');
    }

    output
}

/// Walk, annotate, and format in one step.
pub fn render_tree(
    root: &Path,
    max_depth: usize,
    cache: &FileNameCache,
    annotate_recent: bool,
) -> Result<String, ExplorerError> {
    let listings = collect_listings(root, max_depth, cache)?;
    let recent = if annotate_recent {
        most_recent_subdir(root)
    } else {
        None
    };
    Ok(format_listings(&listings, root, recent.as_deref()))
}
