//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Level priority:
//! 1. explicit level passed by the binary (CLI argument / server config)
//! 2. `CRITICAL_PATH_LOG` environment variable
//! 3. `info`
//!
//! Logs go to stderr; stdout is reserved for command output.

use crate::config::LOG_ENV;
use tracing::Level;
use tracing_subscriber::fmt;

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(explicit: Option<&str>) {
    let level = explicit
        .and_then(parse_level_str)
        .or_else(|| {
            std::env::var(LOG_ENV)
                .ok()
                .and_then(|s| parse_level_str(&s))
        })
        .unwrap_or(Level::INFO);

    let _ = fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!(parse_level_str("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_level_str(" warning "), Some(Level::WARN));
        assert_eq!(parse_level_str("loud"), None);
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logging(Some("error"));
        init_logging(Some("debug"));
    }
}
