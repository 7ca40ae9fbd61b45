//! Logging setup for Criters.
//!
//! The compiler emits `tracing` events (`debug!` once per compiled filter,
//! `trace!` per validated field and resolved hop). Install a subscriber
//! yourself, or enable the `tracing-subscriber` feature and call [`init`].
//!
//! # Environment Variables
//!
//! - `CRITERS_DEBUG=true|1|yes` - Enable debug logging
//! - `CRITERS_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific level
//! - `CRITERS_LOG_FORMAT=json|pretty|compact` - Output format (default: compact)
//!
//! # Usage
//!
//! ```rust,no_run
//! use criters_query::logging;
//!
//! logging::init();
//! ```

use std::env;
use std::sync::Once;

use criters_schema::LogFormat;
use criters_schema::config::DebugConfig;

static INIT: Once = Once::new();

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Check if `CRITERS_DEBUG` is set to "true", "1" or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("CRITERS_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Log level from `CRITERS_LOG_LEVEL`.
///
/// Falls back to "debug" when `CRITERS_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    env::var("CRITERS_LOG_LEVEL")
        .ok()
        .and_then(|level| normalize_level(&level))
        .unwrap_or(fallback)
}

/// Log format from `CRITERS_LOG_FORMAT`, compact when unset or unknown.
pub fn get_log_format() -> LogFormat {
    env::var("CRITERS_LOG_FORMAT")
        .ok()
        .and_then(|f| f.parse().ok())
        .unwrap_or_default()
}

fn normalize_level(level: &str) -> Option<&'static str> {
    let level = level.to_lowercase();
    LEVELS.iter().copied().find(|l| *l == level)
}

/// Directive covering every Criters crate at `level`.
pub fn filter_directive(level: &str) -> String {
    format!("criters={level},criters_query={level},criters_schema={level}")
}

/// Initialize logging from the environment.
///
/// Does nothing unless `CRITERS_DEBUG` or `CRITERS_LOG_LEVEL` is set.
/// Subsequent calls are no-ops.
pub fn init() {
    if !is_debug_enabled() && env::var("CRITERS_LOG_LEVEL").is_err() {
        return;
    }
    install(get_log_level(), get_log_format());
}

/// Initialize logging from the `[debug]` section of `criters.toml`.
///
/// Environment variables still win over the file when set.
pub fn init_with_config(config: &DebugConfig) {
    let level = env::var("CRITERS_LOG_LEVEL")
        .ok()
        .and_then(|level| normalize_level(&level))
        .or_else(|| normalize_level(&config.log_level))
        .unwrap_or("warn");
    let format = env::var("CRITERS_LOG_FORMAT")
        .ok()
        .and_then(|f| f.parse().ok())
        .unwrap_or(config.log_format);
    install(level, format);
}

#[cfg(feature = "tracing-subscriber")]
fn install(level: &'static str, format: LogFormat) {
    INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let filter =
            EnvFilter::try_new(filter_directive(level)).unwrap_or_else(|_| EnvFilter::new("warn"));

        let registry = tracing_subscriber::registry().with(filter);
        let result = match format {
            LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
            LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
            LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
        };

        if result.is_ok() {
            tracing::info!(level, ?format, "Criters logging initialized");
        }
    });
}

#[cfg(not(feature = "tracing-subscriber"))]
fn install(_level: &'static str, _format: LogFormat) {
    // Without the subscriber feature events only reach a caller-installed subscriber.
    INIT.call_once(|| {});
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("DEBUG"), Some("debug"));
        assert_eq!(normalize_level("trace"), Some("trace"));
        assert_eq!(normalize_level("verbose"), None);
    }

    #[test]
    fn test_filter_directive() {
        assert_eq!(
            filter_directive("trace"),
            "criters=trace,criters_query=trace,criters_schema=trace"
        );
    }

    #[test]
    fn test_log_level_default() {
        // SAFETY: no other test in this crate reads these variables.
        unsafe {
            env::remove_var("CRITERS_DEBUG");
            env::remove_var("CRITERS_LOG_LEVEL");
        }
        assert!(!is_debug_enabled());
        assert_eq!(get_log_level(), "warn");
    }
}
