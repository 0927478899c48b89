//! Logging infrastructure for Sift.
//!
//! Structured logging controlled by environment variables.
//!
//! # Environment Variables
//!
//! - `SIFT_DEBUG=true` - Enable debug logging
//! - `SIFT_DEBUG=1` - Enable debug logging
//! - `SIFT_LOG_LEVEL=debug|info|warn|error|trace` - Set specific log level
//! - `SIFT_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use sift_query::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//! ```
//!
//! Inside Sift the standard tracing macros are used:
//!
//! ```rust,ignore
//! debug!(entity = T::NAME, filter = %filter, "applying compiled filter");
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `SIFT_DEBUG`.
///
/// Returns `true` if `SIFT_DEBUG` is set to "true", "1", or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("SIFT_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `SIFT_LOG_LEVEL`.
///
/// Defaults to "debug" if `SIFT_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("SIFT_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Get the configured log format from `SIFT_LOG_FORMAT`.
///
/// Defaults to "json" for structured logging.
pub fn get_log_format() -> &'static str {
    env::var("SIFT_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize the Sift logging system.
///
/// Call once at application startup; subsequent calls are no-ops. Without
/// the `tracing-subscriber` feature this only records that initialization
/// happened and the host application is expected to install a subscriber.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("SIFT_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "sift={},sift_query={},sift_schema={}",
                level, level, level
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            let registry = tracing_subscriber::registry().with(filter);
            let installed = match get_log_format() {
                "json" => registry.with(fmt::layer().json()).try_init(),
                "compact" => registry.with(fmt::layer().compact()).try_init(),
                _ => registry.with(fmt::layer().pretty()).try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level = level,
                    format = get_log_format(),
                    "Sift logging initialized"
                );
            }
        }
    });
}

/// Trace-level logging gated on `SIFT_DEBUG` at runtime.
#[macro_export]
macro_rules! sift_trace {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            $crate::__tracing::trace!($($arg)*);
        }
    };
}

/// Debug-level logging gated on `SIFT_DEBUG` at runtime.
#[macro_export]
macro_rules! sift_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            $crate::__tracing::debug!($($arg)*);
        }
    };
}
