//! One-directional file mirroring from an upload directory into local storage.
//!
//! The synchronizer has two modes that share a single-file copy routine: a
//! full scan that seeds the destination before any events are trusted, and a
//! live `notify` watcher that re-copies individual files as they change.
//! Deletions are never propagated; the mirror only adds and updates.

use std::fs;
use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("path '{}' is outside the sync source '{}'", .path.display(), .root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

fn io_err(path: &Path, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Copy one file from under `source_root` to the same relative path under
/// `dest_root`, creating destination directories as needed.
///
/// The copy is a whole-file replace (last write wins) and carries the source
/// modification time over to the destination so mtime-based "most recent"
/// lookups remain meaningful after a sync.
pub fn copy_file(
    source_root: &Path,
    dest_root: &Path,
    source_path: &Path,
) -> Result<PathBuf, SyncError> {
    let rel_path = source_path
        .strip_prefix(source_root)
        .map_err(|_| SyncError::OutsideRoot {
            path: source_path.to_path_buf(),
            root: source_root.to_path_buf(),
        })?;
    let dest_path = dest_root.join(rel_path);

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let modified = fs::metadata(source_path)
        .and_then(|m| m.modified())
        .map_err(|e| io_err(source_path, e))?;

    fs::copy(source_path, &dest_path).map_err(|e| io_err(&dest_path, e))?;

    let dest_file = fs::File::options()
        .write(true)
        .open(&dest_path)
        .map_err(|e| io_err(&dest_path, e))?;
    dest_file
        .set_modified(modified)
        .map_err(|e| io_err(&dest_path, e))?;

    Ok(dest_path)
}

/// Mirrors a source directory tree into a destination tree.
pub struct FileSynchronizer {
    source_dir: PathBuf,
    dest_dir: PathBuf,
    watcher: Option<RecommendedWatcher>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl FileSynchronizer {
    pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            watcher: None,
            shutdown_tx: None,
        }
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Sync a single source file into the destination tree.
    pub fn sync_single_file(&self, source_path: &Path) -> Result<PathBuf, SyncError> {
        let dest = copy_file(&self.source_dir, &self.dest_dir, source_path)?;
        log::info!(
            "Synced: {} -> {}",
            source_path.display(),
            dest.display()
        );
        Ok(dest)
    }

    /// Walk the whole source tree and copy every file into the destination.
    ///
    /// Per-file failures are logged and skipped; the scan continues. Returns
    /// the number of files copied successfully. A missing source directory is
    /// not an error: there is simply nothing to mirror yet.
    pub fn sync_all(&self) -> Result<usize, SyncError> {
        if !self.source_dir.exists() {
            return Ok(0);
        }

        let mut synced = 0usize;
        for entry in WalkDir::new(&self.source_dir) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry during full sync: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                // Mirror directories even when empty.
                if let Ok(rel) = entry.path().strip_prefix(&self.source_dir) {
                    let dest_dir = self.dest_dir.join(rel);
                    if let Err(e) = fs::create_dir_all(&dest_dir) {
                        log::warn!("Failed to create '{}': {}", dest_dir.display(), e);
                    }
                }
                continue;
            }

            if !entry.file_type().is_file() {
                continue;
            }

            match self.sync_single_file(entry.path()) {
                Ok(_) => synced += 1,
                Err(e) => log::error!("Failed to sync '{}': {}", entry.path().display(), e),
            }
        }

        if synced > 0 {
            log::info!("Full synchronization complete. Synced {} files.", synced);
        }
        Ok(synced)
    }

    /// Perform the initial full sync and start the live watcher.
    ///
    /// A missing source directory is a logged no-op: the process continues
    /// without live sync. Calling this while already watching is also a
    /// logged no-op. Must run inside a tokio runtime (the event worker is a
    /// spawned task).
    pub fn start_watching(&mut self) -> Result<(), SyncError> {
        if self.watcher.is_some() {
            log::warn!("Synchronizer watcher already running");
            return Ok(());
        }

        if !self.source_dir.exists() {
            log::warn!(
                "Source directory for sync does not exist: {}",
                self.source_dir.display()
            );
            return Ok(());
        }

        log::info!("Performing initial full sync...");
        self.sync_all()?;

        let (event_tx, mut event_rx) = mpsc::channel::<PathBuf>(256);
        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(event) => event,
                    Err(e) => {
                        log::warn!("Watcher error: {}", e);
                        return;
                    }
                };

                // Creates, data modifications, and renames all funnel into the
                // same single-file copy; other event kinds are noise here.
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    return;
                }

                for path in event.paths {
                    if let Err(e) = event_tx.try_send(path) {
                        log::warn!("Dropping sync event: {}", e);
                    }
                }
            },
            notify::Config::default(),
        )?;
        watcher.watch(&self.source_dir, RecursiveMode::Recursive)?;

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let source_dir = self.source_dir.clone();
        let dest_dir = self.dest_dir.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        log::info!("File synchronizer worker shutting down");
                        break;
                    }
                    event = event_rx.recv() => {
                        let Some(path) = event else { break };
                        // Directories show up for create events; only regular
                        // files are copied. For a rename, the vanished source
                        // path fails this check and only the new path syncs.
                        if !path.is_file() {
                            continue;
                        }
                        match copy_file(&source_dir, &dest_dir, &path) {
                            Ok(dest) => {
                                log::info!("Synced: {} -> {}", path.display(), dest.display());
                            }
                            Err(e) => {
                                log::error!("Failed to sync '{}': {}", path.display(), e);
                            }
                        }
                    }
                }
            }
        });

        self.watcher = Some(watcher);
        self.shutdown_tx = Some(shutdown_tx);
        log::info!(
            "Started file synchronizer watching {}",
            self.source_dir.display()
        );
        Ok(())
    }

    /// Stop the watcher and its worker task. Safe to call when never started.
    pub fn stop_watching(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if self.watcher.take().is_some() {
            log::info!("Stopped file synchronizer");
        }
    }
}

impl Drop for FileSynchronizer {
    fn drop(&mut self) {
        self.stop_watching();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write_file(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn sync_all_mirrors_nested_tree() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write_file(&source.path().join("a/b.txt"), "hi");
        write_file(&source.path().join("top.txt"), "top");

        let sync = FileSynchronizer::new(source.path(), dest.path());
        let count = sync.sync_all().unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            fs::read_to_string(dest.path().join("a/b.txt")).unwrap(),
            "hi"
        );
        assert_eq!(
            fs::read_to_string(dest.path().join("top.txt")).unwrap(),
            "top"
        );
    }

    #[test]
    fn sync_all_preserves_modification_time() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let src_file = source.path().join("stamp.txt");
        write_file(&src_file, "content");

        let sync = FileSynchronizer::new(source.path(), dest.path());
        sync.sync_all().unwrap();

        let src_mtime = fs::metadata(&src_file).unwrap().modified().unwrap();
        let dest_mtime = fs::metadata(dest.path().join("stamp.txt"))
            .unwrap()
            .modified()
            .unwrap();
        let drift = src_mtime
            .duration_since(dest_mtime)
            .unwrap_or_else(|e| e.duration());
        assert!(drift < Duration::from_secs(2), "mtime drift: {:?}", drift);
    }

    #[test]
    fn sync_all_with_missing_source_is_empty() {
        let dest = TempDir::new().unwrap();
        let sync = FileSynchronizer::new("/no/such/source/dir", dest.path());
        assert_eq!(sync.sync_all().unwrap(), 0);
    }

    #[test]
    fn repeated_copy_is_idempotent() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let src_file = source.path().join("same.txt");
        write_file(&src_file, "stable");

        let sync = FileSynchronizer::new(source.path(), dest.path());
        sync.sync_single_file(&src_file).unwrap();
        sync.sync_single_file(&src_file).unwrap();

        assert_eq!(
            fs::read_to_string(dest.path().join("same.txt")).unwrap(),
            "stable"
        );
    }

    #[test]
    fn copy_rejects_paths_outside_source_root() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let stray = elsewhere.path().join("stray.txt");
        write_file(&stray, "x");

        let err = copy_file(source.path(), dest.path(), &stray).unwrap_err();
        assert!(matches!(err, SyncError::OutsideRoot { .. }));
    }

    #[test]
    fn stop_without_start_is_safe() {
        let mut sync = FileSynchronizer::new("/no/such/source", "/no/such/dest");
        sync.stop_watching();
        assert!(!sync.is_watching());
    }

    #[tokio::test]
    async fn start_watching_missing_source_is_noop() {
        let dest = TempDir::new().unwrap();
        let mut sync = FileSynchronizer::new("/no/such/source/dir", dest.path());
        sync.start_watching().unwrap();
        assert!(!sync.is_watching());
    }

    #[tokio::test]
    async fn watcher_syncs_newly_created_file() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();

        let mut sync = FileSynchronizer::new(source.path(), dest.path());
        sync.start_watching().unwrap();
        assert!(sync.is_watching());

        write_file(&source.path().join("c.txt"), "fresh");

        let dest_file = dest.path().join("c.txt");
        let mut found = false;
        for _ in 0..100 {
            if dest_file.is_file()
                && fs::read_to_string(&dest_file).unwrap_or_default() == "fresh"
            {
                found = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        sync.stop_watching();

        assert!(found, "watched file never appeared in destination");
    }

    #[tokio::test]
    async fn start_watching_runs_initial_full_sync() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write_file(&source.path().join("seed.txt"), "already there");

        let mut sync = FileSynchronizer::new(source.path(), dest.path());
        sync.start_watching().unwrap();
        sync.stop_watching();

        assert_eq!(
            fs::read_to_string(dest.path().join("seed.txt")).unwrap(),
            "already there"
        );
    }
}
