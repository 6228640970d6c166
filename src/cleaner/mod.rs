//! Cleaner module - Source tree cleanup for design-verification workspaces
//!
//! Deletes every file whose extension is not allow-listed, prunes directories
//! left empty, then strips comments and blank lines from the files that remain.

pub mod collector;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod patterns;
pub mod pipeline;
pub mod stats;

pub use collector::{CollectEvent, Collection, Collector};
pub use config::{CommentSyntax, Config, CONFIG_FILE_NAME};
pub use error::CleanError;
pub use normalizer::{NormalizeOptions, Normalizer};
pub use patterns::{extension_of, Disposition, FileFilter};
pub use pipeline::Pipeline;
pub use stats::{CollectStats, FileOutcome, NormalizeStats, RunReport};
