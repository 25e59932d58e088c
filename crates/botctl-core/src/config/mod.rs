mod loader;
pub mod template;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use loader::{config_dir, load, load_from, local_config_path, resolve_path, user_config_path};

/// File name of the per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = "botctl.toml";

/// Upper bound for `stop_timeout_secs`.
const MAX_STOP_TIMEOUT_SECS: u64 = 300;

/// Top-level configuration for botctl.
///
/// Loaded from `./botctl.toml` or `~/.config/botctl/config.toml`.
/// Missing sections fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The supervised process and its files.
    pub bot: BotConfig,
    /// Diagnostics for botctl itself.
    pub log: LogConfig,
}

/// What to launch and where to keep its state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Executable to launch, resolved through `PATH`.
    pub program: String,
    /// Arguments passed to `program`.
    pub args: Vec<String>,
    /// PID file path, relative to the working directory.
    pub pid_file: PathBuf,
    /// Combined stdout/stderr of the bot. Truncated on every start.
    pub log_file: PathBuf,
    /// Seconds `stop` waits for the process to exit. `0` returns
    /// right after signalling.
    pub stop_timeout_secs: u64,
}

/// Logging settings for the supervisor's own diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level: "trace", "debug", "info", "warn", or "error".
    pub level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            program: "python3".into(),
            args: vec!["bot.py".into()],
            pid_file: PathBuf::from("bot.pid"),
            log_file: PathBuf::from("bot.log"),
            stop_timeout_secs: 0,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

impl Config {
    /// Clamps values to safe ranges and restores defaults for values
    /// that cannot be used.
    pub fn validate(&mut self) {
        let defaults = BotConfig::default();
        if self.bot.program.trim().is_empty() {
            self.bot.program = defaults.program;
        }
        if self.bot.pid_file.as_os_str().is_empty() {
            self.bot.pid_file = defaults.pid_file;
        }
        if self.bot.log_file.as_os_str().is_empty() {
            self.bot.log_file = defaults.log_file;
        }
        self.bot.stop_timeout_secs = self.bot.stop_timeout_secs.min(MAX_STOP_TIMEOUT_SECS);
        self.log.level = normalize_level(&self.log.level).into();
    }
}

/// Maps a configured level to a `tracing` level name, defaulting to `warn`.
fn normalize_level(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "error" => "error",
        _ => "warn",
    }
}
