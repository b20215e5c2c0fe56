//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};
use log::LevelFilter;

/// Initialize the logging system from `RUST_LOG` only
pub fn init() {
    // A second initialization (tests, embedded hosts) is not an error.
    let _ = env_logger::Builder::from_default_env().try_init();
}

/// Initialize the logging system with a default level derived from the
/// engine debug level (0..=5). `RUST_LOG` still overrides it.
pub fn init_with_debug_level(debug_level: u8) {
    let _ = env_logger::Builder::new()
        .filter_level(level_for_debug(debug_level))
        .parse_default_env()
        .try_init();
}

/// Map an engine debug level to a log filter
pub fn level_for_debug(debug_level: u8) -> LevelFilter {
    match debug_level {
        0 => LevelFilter::Info,
        1 | 2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
