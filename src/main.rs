use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::io::IsTerminal;
use std::path::PathBuf;

use dvclean::cleaner::{Config, Pipeline};

/// Delete non-source files and strip comments and blank lines from the rest
#[derive(Debug, Parser)]
#[command(name = "dvclean", version)]
struct Cli {
    /// Root directory to process
    #[arg(long, default_value = ".")]
    path: PathBuf,

    /// Keep indentation instead of collapsing whitespace
    #[arg(long)]
    no_flatten: bool,

    /// Do not strip comments
    #[arg(long)]
    keep_comments: bool,

    /// Comma-separated extensions to keep [default: .sv,.v,.svh]
    #[arg(long, value_name = "CSV")]
    extensions: Option<String>,

    /// Config file (defaults to <path>/.dvclean.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::discover(&self.path)?,
        };

        if self.no_flatten {
            config.flatten = false;
        }
        if self.keep_comments {
            config.keep_comments = true;
        }
        if let Some(ref csv) = self.extensions {
            config.set_extensions_csv(csv);
        }
        config.protect_entry_point();
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    dvclean::init_logging(cli.verbose);

    let config = cli.resolve_config().context("failed to load configuration")?;
    tracing::debug!(?config, "resolved configuration");

    Pipeline::new(config)
        .with_quiet(cli.quiet)
        .with_progress(std::io::stderr().is_terminal())
        .run(&cli.path)
        .with_context(|| format!("cleanup of {} failed", cli.path.display()))?;

    Ok(())
}
