// Directory collector
// Walks the tree bottom-up, deletes files outside the allow-list, prunes
// directories left empty and gathers the files to normalize

use std::fs;
use std::path::{Path, PathBuf};

use super::error::CleanError;
use super::patterns::{Disposition, FileFilter};
use super::stats::CollectStats;

/// Something the collector did to the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectEvent {
    FileDeleted(PathBuf),
    DirRemoved(PathBuf),
}

/// Type alias for the event callback
pub type CollectCallback<'a> = Box<dyn Fn(&CollectEvent) + 'a>;

/// Output of a collection pass
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Allow-listed files, in traversal order
    pub kept: Vec<PathBuf>,
    pub stats: CollectStats,
}

pub struct Collector<'a> {
    filter: &'a FileFilter,
    callback: Option<CollectCallback<'a>>,
}

impl<'a> Collector<'a> {
    pub fn new(filter: &'a FileFilter) -> Self {
        Self {
            filter,
            callback: None,
        }
    }

    /// Observe deletions and directory removals as they happen
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&CollectEvent) + 'a,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Walk `root` once, deleting and pruning as described by the filter
    ///
    /// # Returns
    /// The kept files plus deletion statistics. Only an unusable root is an
    /// error; everything below it is logged and counted.
    pub fn collect(&self, root: &Path) -> Result<Collection, CleanError> {
        let metadata = fs::metadata(root).map_err(|e| {
            CleanError::from_io_error(e, "scanning directory", Some(root.to_path_buf()))
        })?;
        if !metadata.is_dir() {
            return Err(CleanError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let mut collection = Collection::default();
        self.visit(root, &mut collection);
        Ok(collection)
    }

    fn emit(&self, event: CollectEvent) {
        if let Some(ref callback) = self.callback {
            callback(&event);
        }
    }

    /// Returns whether anything in `dir`'s subtree was deleted or pruned.
    fn visit(&self, dir: &Path, collection: &mut Collection) -> bool {
        // Snapshot the listing before deleting anything inside it
        let entries: Vec<fs::DirEntry> = match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|entry_result| match entry_result {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!(
                            dir = %dir.display(),
                            error = %e,
                            "cannot read directory entry"
                        );
                        collection.stats.unreadable += 1;
                        None
                    }
                })
                .collect(),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot read directory");
                collection.stats.unreadable += 1;
                return false;
            }
        };

        let mut changed = false;
        for entry in entries {
            let path = entry.path();

            // DirEntry::metadata does not follow symlinks
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot read metadata");
                    collection.stats.unreadable += 1;
                    continue;
                }
            };

            if metadata.is_dir() {
                if self.filter.is_skipped_dir(&path) {
                    tracing::debug!(path = %path.display(), "skipping control directory");
                    continue;
                }
                // Directories that were empty before the run are left in place
                if self.visit(&path, collection) {
                    self.prune_if_empty(&path, &mut collection.stats);
                    changed = true;
                }
            } else if metadata.is_file() {
                changed |= self.handle_file(path, collection);
            } else if metadata.file_type().is_symlink() {
                // Links to directories are left alone; file and dangling links are files
                if fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false) {
                    tracing::debug!(path = %path.display(), "skipping directory symlink");
                    continue;
                }
                changed |= self.handle_file(path, collection);
            }
            // Special files (sockets, fifos, devices) are left alone
        }
        changed
    }

    /// Returns whether the file was deleted.
    fn handle_file(&self, path: PathBuf, collection: &mut Collection) -> bool {
        match self.filter.classify(&path) {
            Disposition::Keep => {
                collection.kept.push(path);
                false
            }
            Disposition::Protected => {
                tracing::debug!(path = %path.display(), "protected file, not deleting");
                collection.stats.files_protected += 1;
                false
            }
            Disposition::Delete => match fs::remove_file(&path) {
                Ok(()) => {
                    collection.stats.files_deleted += 1;
                    self.emit(CollectEvent::FileDeleted(path));
                    true
                }
                Err(e) => {
                    let err = CleanError::from_io_error(e, "deleting", Some(path));
                    tracing::warn!(error = %err, "failed to delete file");
                    collection.stats.delete_failures += 1;
                    false
                }
            },
        }
    }

    fn prune_if_empty(&self, dir: &Path, stats: &mut CollectStats) {
        let is_empty = match fs::read_dir(dir) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => false,
        };
        if !is_empty {
            return;
        }

        match fs::remove_dir(dir) {
            Ok(()) => {
                stats.dirs_removed += 1;
                self.emit(CollectEvent::DirRemoved(dir.to_path_buf()));
            }
            Err(e) => {
                let err =
                    CleanError::from_io_error(e, "removing directory", Some(dir.to_path_buf()));
                tracing::warn!(error = %err, "failed to remove empty directory");
                stats.dir_remove_failures += 1;
            }
        }
    }
}
