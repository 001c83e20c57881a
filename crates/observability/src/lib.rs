//! Tracing/logging setup shared by every binary and test harness.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{LogConfig, LogFormat};

/// Initialize process-wide logging from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogConfig::from_env());
}

/// Initialize process-wide logging from an explicit configuration.
pub fn init_with(config: LogConfig) {
    tracing::init(config);
}
