//! Diagnostics for botctl itself, written to stderr.
//!
//! User-facing results go to stdout through `println!`; tracing output is
//! for troubleshooting and stays quiet at the default `warn` level.

use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable overriding the configured level (`RUST_LOG` syntax).
const LOG_ENV: &str = "BOTCTL_LOG";

/// Environment variable selecting `json` or `pretty` (default) output.
const FORMAT_ENV: &str = "BOTCTL_LOG_FORMAT";

/// Initializes the global tracing subscriber. Call once, after the
/// configuration is loaded.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(format!("botctl={level},botctl_core={level},botctl_unix={level}"))
    });

    let format = std::env::var(FORMAT_ENV)
        .unwrap_or_default()
        .to_lowercase();

    let result = match format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init(),
        _ => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Warning: could not initialize logging: {e}");
    }
}
