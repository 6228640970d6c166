// Run statistics
// Plain accumulators threaded through the collector and normalizer and
// returned to the caller at the end of a run

use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

/// Counters gathered while walking and deleting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub files_deleted: usize,
    pub delete_failures: usize,
    pub files_protected: usize,
    pub dirs_removed: usize,
    pub dir_remove_failures: usize,
    /// Directories or entries that could not be read at all
    pub unreadable: usize,
}

/// Result of normalizing a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Size before the rewrite, in characters
    pub original_size: u64,
    /// Size after the rewrite, in characters
    pub normalized_size: u64,
}

impl FileOutcome {
    pub fn reduction_percent(&self) -> f64 {
        reduction_percent(self.original_size, self.normalized_size)
    }
}

/// Counters gathered while normalizing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub chars_before: u64,
    pub chars_after: u64,
}

impl NormalizeStats {
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.files_processed += 1;
        self.chars_before += outcome.original_size;
        self.chars_after += outcome.normalized_size;
    }

    pub fn record_failure(&mut self) {
        self.files_failed += 1;
    }

    /// Characters saved; negative if tab expansion grew the files.
    pub fn chars_saved(&self) -> i64 {
        self.chars_before as i64 - self.chars_after as i64
    }

    pub fn reduction_percent(&self) -> f64 {
        reduction_percent(self.chars_before, self.chars_after)
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub collect: CollectStats,
    pub normalize: NormalizeStats,
    pub duration: Duration,
}

impl RunReport {
    pub fn print_summary(&self) {
        let saved = self.normalize.chars_saved();
        let saved_display = humansize::format_size(saved.unsigned_abs(), humansize::BINARY);

        println!("\n{}", "Cleanup complete!".bold());
        println!("Files deleted:       {}", self.collect.files_deleted);
        if self.collect.delete_failures > 0 {
            println!("Delete failures:     {}", self.collect.delete_failures.to_string().red());
        }
        if self.collect.files_protected > 0 {
            println!("Files protected:     {}", self.collect.files_protected);
        }
        println!("Directories removed: {}", self.collect.dirs_removed);
        println!("Files normalized:    {}", self.normalize.files_processed);
        if self.normalize.files_failed > 0 {
            println!("Files failed:        {}", self.normalize.files_failed.to_string().red());
        }
        println!(
            "Characters:          {} -> {}",
            self.normalize.chars_before, self.normalize.chars_after
        );
        let verb = if saved >= 0 { "saved" } else { "added" };
        println!(
            "Estimated size reduction: {} {} ({})",
            format!("~{}", saved_display).green(),
            verb,
            format!("{:.1}%", self.normalize.reduction_percent()).yellow()
        );
        println!("Duration: {:.2}s", self.duration.as_secs_f64());
    }
}

/// Percentage shrink from `before` to `after`; 0 when there was nothing to shrink.
pub fn reduction_percent(before: u64, after: u64) -> f64 {
    if before == 0 {
        return 0.0;
    }
    (before as f64 - after as f64) / before as f64 * 100.0
}
