//! Tracing initialization.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter: warnings only, so stdout stays clean for command output.
pub const DEFAULT_FILTER: &str = "warn";

/// Filter used with `--verbose`.
pub const VERBOSE_FILTER: &str = "apikey_gen=debug,warn";

/// Initialize tracing to stderr. `RUST_LOG` overrides `default_filter`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
