//! Cleaner configuration.
//!
//! Built-in defaults, optionally overlaid by a `.dvclean.toml` file in the
//! scanned root (or an explicit `--config` file), then by command-line flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::CleanError;

/// File name looked up in the root directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = ".dvclean.toml";

/// Extensions kept by default (SystemVerilog / Verilog sources and headers).
pub const DEFAULT_EXTENSIONS: &[&str] = &[".sv", ".v", ".svh"];

/// Directories never descended into, never pruned.
pub const DEFAULT_SKIP_DIRS: &[&str] = &[".git"];

/// Comment markers, matched literally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentSyntax {
    pub block_start: String,
    pub block_end: String,
    pub line: String,
}

impl Default for CommentSyntax {
    fn default() -> Self {
        Self {
            block_start: "/*".to_string(),
            block_end: "*/".to_string(),
            line: "//".to_string(),
        }
    }
}

/// Settings for a cleaning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Allow-list of extensions, leading `.` included.
    pub extensions: Vec<String>,
    /// Collapse whitespace runs and drop indentation.
    pub flatten: bool,
    /// Leave comments in place.
    pub keep_comments: bool,
    /// Directory names skipped entirely (e.g. version-control metadata).
    pub skip_dirs: Vec<String>,
    /// File names never deleted, whatever their extension.
    pub protected_files: Vec<String>,
    pub comments: CommentSyntax,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            flatten: true,
            keep_comments: false,
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            protected_files: vec![CONFIG_FILE_NAME.to_string()],
            comments: CommentSyntax::default(),
        }
    }
}

impl Config {
    /// Load a configuration file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, CleanError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CleanError::from_io_error(e, "reading config file", Some(path.to_path_buf()))
        })?;
        Self::from_toml(&content, path)
    }

    /// Parse TOML content; `origin` is only used for error messages.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self, CleanError> {
        let mut config: Config = toml::from_str(content).map_err(|e| CleanError::Config {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.ensure_protected(CONFIG_FILE_NAME);
        config.validate(origin)?;
        Ok(config)
    }

    /// Load `<root>/.dvclean.toml` if present, otherwise the defaults.
    pub fn discover(root: &Path) -> Result<Self, CleanError> {
        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::info!(path = %candidate.display(), "loading config file");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Replace the allow-list from a comma-separated `--extensions` value.
    pub fn set_extensions_csv(&mut self, csv: &str) {
        self.extensions = parse_extension_list(csv);
    }

    /// Add a file name to the protected list if it is not already there.
    pub fn ensure_protected(&mut self, name: &str) {
        if !self.protected_files.iter().any(|p| p == name) {
            self.protected_files.push(name.to_string());
        }
    }

    /// Protect the running executable so it never deletes itself.
    pub fn protect_entry_point(&mut self) {
        if let Some(name) = entry_point_name() {
            self.ensure_protected(&name);
        }
    }

    fn validate(&self, origin: &Path) -> Result<(), CleanError> {
        let markers = [
            ("comments.block_start", &self.comments.block_start),
            ("comments.block_end", &self.comments.block_end),
            ("comments.line", &self.comments.line),
        ];
        for (key, value) in markers {
            if value.is_empty() {
                return Err(CleanError::Config {
                    path: origin.to_path_buf(),
                    reason: format!("{} must not be empty", key),
                });
            }
        }
        Ok(())
    }

    /// Warn about allow-list entries that can never match an extension.
    pub fn warn_on_suspicious_extensions(&self) {
        if self.extensions.is_empty() {
            tracing::warn!("extension allow-list is empty, every file will be deleted");
        }
        for ext in &self.extensions {
            if !ext.starts_with('.') {
                tracing::warn!(
                    extension = %ext,
                    "extension has no leading '.', it will never match"
                );
            }
        }
    }
}

/// Split a comma-separated extension list, trimming entries and dropping empty ones.
pub fn parse_extension_list(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// File name of the running executable.
pub fn entry_point_name() -> Option<String> {
    let exe: PathBuf = std::env::current_exe().ok()?;
    exe.file_name().map(|n| n.to_string_lossy().into_owned())
}
