//! File classification against the extension allow-list.

use std::collections::HashSet;
use std::path::Path;

use super::config::Config;

/// What the collector should do with a regular file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Extension is allow-listed; normalize it.
    Keep,
    /// Not allow-listed but protected by name; leave it alone.
    Protected,
    Delete,
}

/// Allow-list, protected names and control directories for one run.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    extensions: HashSet<String>,
    protected: HashSet<String>,
    skip_dirs: HashSet<String>,
}

impl FileFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
            protected: HashSet::new(),
            skip_dirs: HashSet::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.extensions.iter().cloned())
            .with_protected(config.protected_files.iter().cloned())
            .with_skip_dirs(config.skip_dirs.iter().cloned())
    }

    pub fn with_protected<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protected.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_skip_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_dirs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Classify a regular file by its name.
    pub fn classify(&self, path: &Path) -> Disposition {
        let name = file_name(path);
        if self.extensions.contains(extension_of(&name)) {
            Disposition::Keep
        } else if self.protected.contains(name.as_str()) {
            Disposition::Protected
        } else {
            Disposition::Delete
        }
    }

    /// Whether a directory is a control directory to skip entirely.
    pub fn is_skipped_dir(&self, path: &Path) -> bool {
        self.skip_dirs.contains(file_name(path).as_str())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extension of a file name including the leading `.`, or `""` if it has none.
///
/// Leading dots are part of the stem, so `.bashrc` has no extension while
/// `a.tar.gz` has `.gz`.
pub fn extension_of(name: &str) -> &str {
    let stem_start = name.len() - name.trim_start_matches('.').len();
    match name[stem_start..].rfind('.') {
        Some(idx) => &name[stem_start + idx..],
        None => "",
    }
}
