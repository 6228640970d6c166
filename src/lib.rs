// Library module for dvclean
// Re-exports modules for use in integration tests and the binary

pub mod cleaner;

/// Initialize logging for the binary
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks warn, info or debug.
pub fn init_logging(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = match verbose {
        0 => "dvclean=warn",
        1 => "dvclean=info",
        _ => "dvclean=debug",
    };

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
