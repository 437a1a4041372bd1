//! Logging utilities for Scout services.
//!
//! Provides structured JSON or human-readable logging through
//! `tracing-subscriber`.
//!
//! # Target Filtering
//!
//! Targets listed in `observability.excluded_targets` are held at `warn`
//! so that the remaining logs stay readable at the configured level.
//! `RUST_LOG` always wins when set.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Build the filter directive string for a base level.
fn build_directives(log_level: &str, excluded_targets: &[String]) -> String {
    let mut directives = String::from(log_level);

    for target in excluded_targets {
        directives.push_str(&format!(",{}=warn", target));
    }

    directives
}

/// Build the EnvFilter for a base level and excluded targets.
fn build_filter(log_level: &str, excluded_targets: &[String]) -> EnvFilter {
    // Environment variable first (allows override)
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::new(build_directives(log_level, excluded_targets))
}

/// Run `f` under a temporary pretty stderr subscriber.
///
/// Used while the configuration that selects the real subscriber is still
/// being loaded, so events emitted during loading are not lost.
pub fn with_bootstrap_logging<T>(log_level: &str, f: impl FnOnce() -> T) -> T {
    let subscriber = tracing_subscriber::registry()
        .with(build_filter(log_level, &[]))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        );

    let _guard = subscriber.set_default();
    f()
}

/// Initialize logging with the given configuration.
///
/// # Arguments
///
/// * `log_level` - Base log level (trace, debug, info, warn, error)
/// * `log_format` - Output format: "json" for structured JSON, "pretty" for human-readable
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(log_level: &str, log_format: &str) {
    init_logging_with_exclusions(log_level, log_format, &[]);
}

/// Initialize logging with custom excluded targets.
///
/// Like `init_logging`, but holds the given targets at `warn`.
pub fn init_logging_with_exclusions(log_level: &str, log_format: &str, excluded_targets: &[String]) {
    let filter = build_filter(log_level, excluded_targets);

    let subscriber = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so rendered reports on stdout stay clean
    if log_format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        let _ = subscriber.with(fmt_layer).try_init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .with_file(false)
            .with_line_number(false);
        let _ = subscriber.with(fmt_layer).try_init();
    }

    tracing::debug!(
        log_level = %log_level,
        log_format = %log_format,
        excluded_targets = excluded_targets.len(),
        "Logging initialized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_base_level_only() {
        assert_eq!(build_directives("debug", &[]), "debug");
    }

    #[test]
    fn test_directives_include_custom_exclusions() {
        let directives = build_directives(
            "info",
            &["scout_screener::data".to_string(), "scout_common".to_string()],
        );
        assert_eq!(directives, "info,scout_screener::data=warn,scout_common=warn");
    }

    #[test]
    fn test_bootstrap_logging_returns_closure_value() {
        let value = with_bootstrap_logging("info", || {
            tracing::info!("emitted while loading configuration");
            42
        });
        assert_eq!(value, 42);

        // A new scope can be opened once the first guard drops.
        assert_eq!(with_bootstrap_logging("warn", || "ok"), "ok");
    }

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging("info", "pretty");
        init_logging("debug", "json");
    }
}
