//! Text normalization for kept source files.
//!
//! Strips block and line comments, drops blank lines and squeezes whitespace,
//! then rewrites the file in place.
//!
//! Comments are found with regular expressions, not a lexer. Markers inside
//! string literals are stripped like any other, and block comments do not
//! nest: the first end marker closes the comment. An unterminated block start
//! is left as-is.

use regex::Regex;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

use super::config::CommentSyntax;
use super::error::CleanError;
use super::stats::FileOutcome;

/// Spaces substituted for each tab when indentation is preserved.
pub const TAB_WIDTH: usize = 4;

/// Per-run normalization switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Collapse whitespace runs to one space and drop indentation.
    pub flatten: bool,
    pub keep_comments: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            flatten: true,
            keep_comments: false,
        }
    }
}

pub struct Normalizer {
    options: NormalizeOptions,
    block_comment: Regex,
    line_comment: Regex,
    tab: String,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions, syntax: &CommentSyntax) -> Result<Self, CleanError> {
        if syntax.block_start.is_empty() || syntax.block_end.is_empty() || syntax.line.is_empty() {
            return Err(CleanError::InvalidCommentSyntax {
                reason: "comment markers must not be empty".to_string(),
            });
        }

        let block_pattern = format!(
            "(?s){}.*?{}",
            regex::escape(&syntax.block_start),
            regex::escape(&syntax.block_end)
        );
        let line_pattern = format!("{}[^\n]*", regex::escape(&syntax.line));

        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| CleanError::InvalidCommentSyntax {
                reason: e.to_string(),
            })
        };

        Ok(Self {
            options,
            block_comment: compile(&block_pattern)?,
            line_comment: compile(&line_pattern)?,
            tab: " ".repeat(TAB_WIDTH),
        })
    }

    /// Remove all block comments, then all line comments, over the whole buffer.
    ///
    /// The block pass repeats until nothing matches, since removing one
    /// comment can splice a new `/*` ... `*/` pair together (`//* a */* b */`).
    pub fn strip_comments(&self, text: &str) -> String {
        let mut without_blocks = text.to_string();
        loop {
            let next = match self.block_comment.replace_all(&without_blocks, "") {
                Cow::Borrowed(_) => break,
                Cow::Owned(next) => next,
            };
            without_blocks = next;
        }
        self.line_comment.replace_all(&without_blocks, "").into_owned()
    }

    /// Transform a whole buffer. The result ends in exactly one `\n` unless
    /// no line survives, in which case it is empty.
    pub fn normalize_text(&self, text: &str) -> String {
        let unified = unify_line_endings(text);
        let body = if self.options.keep_comments {
            unified
        } else {
            self.strip_comments(&unified)
        };

        let mut out = String::with_capacity(body.len());
        for line in body.split('\n') {
            if line.trim().is_empty() {
                continue;
            }
            if self.options.flatten {
                flatten_line(line, &mut out);
            } else {
                out.push_str(&line.trim_end().replace('\t', &self.tab));
            }
            out.push('\n');
        }
        out
    }

    /// Load, normalize and overwrite one file.
    pub fn normalize_file(&self, path: &Path) -> Result<FileOutcome, CleanError> {
        let original = fs::read_to_string(path)
            .map_err(|e| CleanError::from_io_error(e, "reading", Some(path.to_path_buf())))?;

        let normalized = self.normalize_text(&original);

        fs::write(path, &normalized)
            .map_err(|e| CleanError::from_io_error(e, "writing", Some(path.to_path_buf())))?;

        Ok(FileOutcome {
            path: path.to_path_buf(),
            original_size: original.chars().count() as u64,
            normalized_size: normalized.chars().count() as u64,
        })
    }
}

/// `\r\n` and lone `\r` become `\n`.
fn unify_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn flatten_line(line: &str, out: &mut String) {
    let mut words = line.split_whitespace();
    if let Some(first) = words.next() {
        out.push_str(first);
        for word in words {
            out.push(' ');
            out.push_str(word);
        }
    }
}
