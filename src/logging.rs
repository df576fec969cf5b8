// File: src/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global fmt subscriber. `RUST_LOG` wins over `verbose`.
/// Calling it twice is harmless; the second install is ignored.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "suggest_core=debug,suggest_engine=debug,warn"
    } else {
        "suggest_core=warn,error"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
}
