//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

use crate::config::EngineConfig;

/// Initialize the logging system from `RUST_LOG`
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = env_logger::try_init();
}

/// Initialize logging with a default filter used when `RUST_LOG` is unset
pub fn init_with_level(level: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

/// Initialize logging from an engine configuration
pub fn init_with_config(config: &EngineConfig) {
    init_with_level(&config.log_level);
}
