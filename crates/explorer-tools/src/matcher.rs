use std::path::{Path, PathBuf};

use explorer_core::ExplorerError;
use walkdir::WalkDir;

use crate::cache::FileNameCache;

/// What a lookup is expected to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    File,
    Directory,
}

/// Normalization applied to both the query and every candidate before the
/// substring test: lowercase, underscores become hyphens. `my_file` therefore
/// matches `My-File.txt`. Idempotent.
pub fn normalize(input: &str) -> String {
    input.to_lowercase().replace('_', "-")
}

fn entry_matches_kind(entry: &walkdir::DirEntry, kind: MatchKind) -> bool {
    match kind {
        MatchKind::File => entry.file_type().is_file(),
        MatchKind::Directory => entry.file_type().is_dir(),
    }
}

fn walk(root: &Path) -> impl Iterator<Item = walkdir::Result<walkdir::DirEntry>> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git")
}

/// Search the roots in order for the first entry whose normalized filename or
/// normalized root-relative path contains the normalized query.
///
/// When several entries partially match, whichever the directory walk visits
/// first wins; that order is filesystem-dependent and callers must not rely
/// on it.
pub fn find_in_roots(
    query: &str,
    roots: &[PathBuf],
    kind: MatchKind,
) -> Result<PathBuf, ExplorerError> {
    let needle = normalize(query);

    for root in roots {
        if !root.exists() {
            log::warn!("Search path does not exist: {}", root.display());
            continue;
        }

        for entry in walk(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            if entry.depth() == 0 || !entry_matches_kind(&entry, kind) {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            let rel_path = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_string_lossy();

            if normalize(&name).contains(&needle) || normalize(&rel_path).contains(&needle) {
                log::info!("'{}' matched: {}", query, entry.path().display());
                return Ok(entry.path().to_path_buf());
            }
        }
    }

    log::error!("'{}' not found in any search path", query);
    Err(ExplorerError::NotFound {
        name: query.to_string(),
        searched: roots.to_vec(),
    })
}

/// Locate a file by its exact name. Used to re-validate cache hits against
/// the live filesystem, since the cache stores bare filenames only.
pub fn find_exact_name(name: &str, roots: &[PathBuf]) -> Option<PathBuf> {
    for root in roots {
        if !root.exists() {
            continue;
        }
        for entry in walk(root).flatten() {
            if entry.file_type().is_file() && entry.file_name().to_string_lossy() == name {
                return Some(entry.path().to_path_buf());
            }
        }
    }
    None
}

/// Full lookup: probe the filename cache first, then fall back to the fuzzy
/// directory walk. A cache hit is promoted to an exact-name walk; a stale hit
/// (file since renamed or deleted) falls through to the fuzzy walk, so the
/// cache can never mask the live filesystem.
pub fn resolve(
    query: &str,
    cache: &FileNameCache,
    roots: &[PathBuf],
    kind: MatchKind,
) -> Result<PathBuf, ExplorerError> {
    if kind == MatchKind::File {
        if let Some(cached_name) = cache.find_match(query) {
            log::debug!("'{}' found in cache as '{}'", query, cached_name);
            if let Some(path) = find_exact_name(&cached_name, roots) {
                return Ok(path);
            }
            log::debug!("Cache entry '{}' is stale, walking directories", cached_name);
        }
    }

    find_in_roots(query, roots, kind)
}
