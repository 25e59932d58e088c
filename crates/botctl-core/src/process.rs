use std::fs::File;
use std::path::{Path, PathBuf};

use crate::config::BotConfig;

/// Everything needed to launch the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    /// Executable, resolved through `PATH`.
    pub program: String,
    /// Arguments passed to the executable.
    pub args: Vec<String>,
    /// File receiving the combined stdout/stderr. Used for messages; the
    /// supervisor opens it and hands the handle to [`ProcessControl::spawn_detached`].
    pub log_file: PathBuf,
}

impl LaunchSpec {
    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            log_file: config.log_file.clone(),
        }
    }

    /// The command line as typed in a shell, for messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn log_path(&self) -> &Path {
        &self.log_file
    }
}

/// Why a signal could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// No process has this PID (it exited between the check and the signal).
    NoSuchProcess,
    /// The process exists but belongs to someone we may not signal.
    PermissionDenied,
    /// Any other OS failure.
    Other(String),
}

/// Platform-agnostic process operations.
///
/// Each platform crate (e.g. `botctl-unix`) provides its own implementation.
/// PIDs are `u64` so that any number found in a PID file can be passed
/// through; values no OS can assign are simply never alive.
pub trait ProcessControl {
    /// Launches the bot detached from the terminal with stdout and stderr
    /// both written to `log`, and returns its PID without waiting for it.
    fn spawn_detached(&self, spec: &LaunchSpec, log: File) -> std::io::Result<u64>;

    /// Returns whether a process with this PID currently exists.
    ///
    /// Existence only: a reused PID also counts as alive.
    fn is_alive(&self, pid: u64) -> bool;

    /// Returns a value that identifies this particular process instance,
    /// such as its start time, or `None` if the platform cannot tell.
    fn start_token(&self, pid: u64) -> Option<u64>;

    /// Sends the default termination signal (`SIGTERM`), never a forced kill.
    fn terminate(&self, pid: u64) -> Result<(), SignalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_joins_program_and_args() {
        // Arrange
        let spec = LaunchSpec {
            program: "python3".into(),
            args: vec!["bot.py".into(), "--verbose".into()],
            log_file: PathBuf::from("bot.log"),
        };

        // Act / Assert
        assert_eq!(spec.command_line(), "python3 bot.py --verbose");
    }

    #[test]
    fn from_config_copies_launch_fields() {
        // Arrange
        let config = BotConfig::default();

        // Act
        let spec = LaunchSpec::from_config(&config);

        // Assert
        assert_eq!(spec.program, "python3");
        assert_eq!(spec.args, vec!["bot.py".to_string()]);
        assert_eq!(spec.log_path(), Path::new("bot.log"));
    }
}
