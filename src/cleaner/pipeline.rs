// Cleanup pipeline
// Runs the collector to completion, then normalizes every kept file in turn

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::collector::{CollectEvent, Collector};
use super::config::Config;
use super::error::CleanError;
use super::normalizer::{NormalizeOptions, Normalizer};
use super::patterns::FileFilter;
use super::stats::{FileOutcome, NormalizeStats, RunReport};

/// Engine for one cleanup run over a directory tree
pub struct Pipeline {
    config: Config,
    quiet: bool,
    show_progress: bool,
}

impl Pipeline {
    /// Create a pipeline with per-file output and no progress bar
    pub fn new(config: Config) -> Self {
        Self {
            config,
            quiet: false,
            show_progress: false,
        }
    }

    /// Only print the final summary
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Show a progress bar while normalizing
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Delete, prune and normalize everything under `root`
    ///
    /// # Returns
    /// Accumulated statistics. Per-file failures are counted in the report;
    /// only setup problems (bad root, bad comment markers) are errors.
    pub fn run(&self, root: &Path) -> Result<RunReport, CleanError> {
        let start_time = Instant::now();

        self.config.warn_on_suspicious_extensions();
        let filter = FileFilter::from_config(&self.config);
        let normalizer = Normalizer::new(
            NormalizeOptions {
                flatten: self.config.flatten,
                keep_comments: self.config.keep_comments,
            },
            &self.config.comments,
        )?;

        self.say(format!("{}", "--- Removing files outside the allow-list ---".bold()));
        let quiet = self.quiet;
        let collection = Collector::new(&filter)
            .with_callback(move |event| {
                if quiet {
                    return;
                }
                match event {
                    CollectEvent::FileDeleted(path) => {
                        println!("{} {}", "Deleted:".red(), path.display())
                    }
                    CollectEvent::DirRemoved(path) => {
                        println!("{} {}", "Removed dir:".red(), path.display())
                    }
                }
            })
            .collect(root)?;

        self.say(format!(
            "\n{}",
            format!("--- Normalizing {} kept files ---", collection.kept.len()).bold()
        ));
        let normalize = self.normalize_all(&normalizer, &collection.kept);

        let report = RunReport {
            collect: collection.stats,
            normalize,
            duration: start_time.elapsed(),
        };
        report.print_summary();
        Ok(report)
    }

    fn normalize_all(&self, normalizer: &Normalizer, files: &[PathBuf]) -> NormalizeStats {
        let pb = if self.show_progress {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(concat!(
                        "[{elapsed_precise}] [{bar:40.cyan/blue}] ",
                        "{pos}/{len} files ({percent}%) | {msg}"
                    ))
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut stats = NormalizeStats::default();

        for path in files {
            pb.set_message(format!("{} OK, {} failed", stats.files_processed, stats.files_failed));

            match normalizer.normalize_file(path) {
                Ok(outcome) => {
                    stats.record(&outcome);
                    if !self.quiet {
                        // Printed above the bar; works when the bar is hidden too
                        pb.suspend(|| println!("{}", describe_outcome(&outcome)));
                    }
                }
                Err(e) => {
                    // Log error but continue processing
                    tracing::warn!(path = %path.display(), error = %e, "failed to normalize file");
                    stats.record_failure();
                }
            }

            pb.inc(1);
        }

        pb.finish_and_clear();
        stats
    }

    fn say(&self, line: String) {
        if !self.quiet {
            println!("{}", line);
        }
    }
}

fn describe_outcome(outcome: &FileOutcome) -> String {
    format!(
        "{} {} ({} -> {} chars, {} smaller)",
        "Processed:".green(),
        outcome.path.display(),
        outcome.original_size,
        outcome.normalized_size,
        format!("{:.1}%", outcome.reduction_percent()).yellow()
    )
}
