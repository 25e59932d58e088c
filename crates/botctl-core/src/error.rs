//! Error types for supervisor operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a supervisor command from completing.
///
/// "Not running" and "stale PID file" are not errors; they are reported
/// through the outcome types in [`crate::supervisor`].
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A live process is already recorded in the PID file.
    #[error("bot is already running (PID: {pid})")]
    AlreadyRunning { pid: u64 },

    /// The target executable could not be started.
    #[error("failed to launch `{program}`: {source}")]
    LaunchFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The OS refused to deliver the termination signal.
    #[error("permission denied sending SIGTERM to PID {pid}")]
    SignalDenied { pid: u64 },

    /// Signal delivery failed for another reason.
    #[error("failed to signal PID {pid}: {message}")]
    Signal { pid: u64, message: String },

    /// The PID file exists but does not hold a usable process ID.
    #[error("invalid PID file {}: {reason}", path.display())]
    InvalidRecord { path: PathBuf, reason: String },

    /// I/O error on one of the supervisor's files.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SupervisorError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error.
    ///
    /// `0` is reserved for normal completion, including "not running"
    /// and stale-record warnings.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Io { .. } | Self::InvalidRecord { .. } => 1,
            Self::LaunchFailed { .. } => 2,
            Self::AlreadyRunning { .. } => 3,
            Self::SignalDenied { .. } | Self::Signal { .. } => 4,
        }
    }
}

/// Result type alias using `SupervisorError`.
pub type Result<T> = std::result::Result<T, SupervisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_failure_class_has_a_distinct_exit_code() {
        // Arrange
        let launch = SupervisorError::LaunchFailed {
            program: "missing".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let running = SupervisorError::AlreadyRunning { pid: 42 };
        let denied = SupervisorError::SignalDenied { pid: 42 };
        let config = SupervisorError::Config("bad".into());

        // Act / Assert
        assert_eq!(config.exit_code(), 1);
        assert_eq!(launch.exit_code(), 2);
        assert_eq!(running.exit_code(), 3);
        assert_eq!(denied.exit_code(), 4);
    }

    #[test]
    fn launch_failure_message_names_the_program() {
        // Arrange
        let err = SupervisorError::LaunchFailed {
            program: "python3".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };

        // Act
        let message = err.to_string();

        // Assert
        assert!(message.contains("`python3`"));
    }
}
