//! Logging setup
//!
//! The level comes from BOOKTRACK_LOG, falling back to `debug` with
//! `--verbose` and `warn` otherwise. Output goes to the configured log file
//! when one is set, else to stderr.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::EnvFilter;

use booktrack_core::Config;

const LOG_ENV: &str = "BOOKTRACK_LOG";

/// Initialize logging for CLI commands
pub fn init(config: &Config, verbose: bool) {
    let level = std::env::var(LOG_ENV)
        .ok()
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| default_level(verbose).to_string());
    let env_filter = EnvFilter::new(filter_directive(&level));

    let Some(log_path) = config.log_file.as_ref() else {
        // Ignore error if already initialized
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
        return;
    };

    let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init();

    info!("Logging to {:?}", log_path);
}

fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

fn filter_directive(level: &str) -> String {
    format!("booktrack_core={},booktrack_cli={}", level, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(
            filter_directive(default_level(false)),
            "booktrack_core=warn,booktrack_cli=warn"
        );
        assert_eq!(
            filter_directive(default_level(true)),
            "booktrack_core=debug,booktrack_cli=debug"
        );
    }
}
