//! Start, status, and stop against a PID file.
//!
//! Every operation holds the [`StateLock`] on the PID file's directory for
//! its whole duration, so concurrent invocations run one after another.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::BotConfig;
use crate::error::{Result, SupervisorError};
use crate::lock::StateLock;
use crate::pid::{PidFile, PidRecord, now_unix_secs};
use crate::process::{LaunchSpec, ProcessControl, SignalError};

/// How often `stop` checks whether the process has exited.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of a successful `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Started {
    pub pid: u64,
    pub log_file: PathBuf,
    /// PID of a dead process whose record was overwritten.
    pub replaced_stale: Option<u64>,
}

/// Why a recorded PID does not refer to the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleReason {
    /// No process with the recorded PID exists.
    NotFound,
    /// A process exists but started later than the recorded one.
    Reused,
}

/// Result of `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Status {
    NotRunning,
    Running {
        pid: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        uptime_secs: Option<u64>,
    },
    /// The PID file is left in place.
    Stale { pid: u64, reason: StaleReason },
}

/// What `stop` observed after signalling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopWait {
    /// `stop_timeout_secs` is zero.
    NotWaited,
    Exited,
    /// Still alive when the timeout ran out.
    TimedOut,
}

/// Result of `stop`. Except for `NotRunning`, the PID file is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    NotRunning,
    Stopped { pid: u64, wait: StopWait },
    Stale { pid: u64, reason: StaleReason },
    /// The PID file held no usable PID.
    Invalid { reason: String },
}

enum Liveness {
    Alive,
    Stale(StaleReason),
}

/// Manages one bot through its PID file.
pub struct Supervisor<P> {
    bot: BotConfig,
    pid_file: PidFile,
    process: P,
}

impl<P: ProcessControl> Supervisor<P> {
    pub fn new(bot: BotConfig, process: P) -> Self {
        let pid_file = PidFile::new(bot.pid_file.clone());
        Self {
            bot,
            pid_file,
            process,
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.bot
    }

    pub fn pid_file(&self) -> &PidFile {
        &self.pid_file
    }

    #[cfg(test)]
    pub(crate) fn process(&self) -> &P {
        &self.process
    }

    /// Launches the bot and records its PID.
    ///
    /// Refuses with [`SupervisorError::AlreadyRunning`] while the recorded
    /// process is alive. A stale or unreadable record is overwritten.
    pub fn start(&self) -> Result<Started> {
        let dir = self.pid_file.dir();
        std::fs::create_dir_all(&dir).map_err(|e| SupervisorError::io(&dir, e))?;
        let _lock = StateLock::acquire(&dir)?;

        let replaced_stale = match self.pid_file.read() {
            Ok(Some(record)) => match self.liveness(&record) {
                Liveness::Alive => {
                    return Err(SupervisorError::AlreadyRunning { pid: record.pid });
                }
                Liveness::Stale(reason) => {
                    tracing::info!(pid = record.pid, ?reason, "replacing stale PID file");
                    Some(record.pid)
                }
            },
            Ok(None) => None,
            Err(SupervisorError::InvalidRecord { path, reason }) => {
                tracing::warn!(path = %path.display(), "overwriting invalid PID file: {reason}");
                None
            }
            Err(e) => return Err(e),
        };

        let spec = LaunchSpec::from_config(&self.bot);
        let log = open_log(spec.log_path())?;
        let pid = self
            .process
            .spawn_detached(&spec, log)
            .map_err(|source| SupervisorError::LaunchFailed {
                program: spec.program.clone(),
                source,
            })?;
        tracing::info!(pid, command = %spec.command_line(), "launched bot");

        let record = PidRecord {
            pid,
            started_at: Some(now_unix_secs()),
            start_token: self.process.start_token(pid),
        };
        if let Err(e) = self.pid_file.write(&record) {
            tracing::warn!(pid, "could not record PID, terminating untracked bot");
            if let Err(signal_err) = self.process.terminate(pid) {
                tracing::warn!(pid, ?signal_err, "untracked bot may still be running");
            }
            return Err(e);
        }

        Ok(Started {
            pid,
            log_file: spec.log_file,
            replaced_stale,
        })
    }

    /// Reports whether the recorded process is alive. Never modifies files.
    pub fn status(&self) -> Result<Status> {
        let dir = self.pid_file.dir();
        if !dir.is_dir() {
            return Ok(Status::NotRunning);
        }
        let _lock = StateLock::acquire_shared(&dir)?;

        let Some(record) = self.pid_file.read()? else {
            return Ok(Status::NotRunning);
        };

        Ok(match self.liveness(&record) {
            Liveness::Alive => Status::Running {
                pid: record.pid,
                uptime_secs: record.uptime_secs(),
            },
            Liveness::Stale(reason) => Status::Stale {
                pid: record.pid,
                reason,
            },
        })
    }

    /// Sends `SIGTERM` to the recorded process and removes the PID file.
    ///
    /// With no PID file this touches nothing. The file is removed whether
    /// or not the process was found, except when the OS refuses the signal:
    /// the process is then still running and the record stays.
    pub fn stop(&self) -> Result<StopOutcome> {
        let dir = self.pid_file.dir();
        if !dir.is_dir() {
            return Ok(StopOutcome::NotRunning);
        }
        let _lock = StateLock::acquire(&dir)?;

        let record = match self.pid_file.read() {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(StopOutcome::NotRunning),
            Err(SupervisorError::InvalidRecord { reason, .. }) => {
                self.pid_file.remove()?;
                return Ok(StopOutcome::Invalid { reason });
            }
            Err(e) => return Err(e),
        };
        let pid = record.pid;

        let outcome = match self.liveness(&record) {
            Liveness::Stale(reason) => StopOutcome::Stale { pid, reason },
            Liveness::Alive => match self.process.terminate(pid) {
                Ok(()) => {
                    tracing::info!(pid, "sent SIGTERM");
                    StopOutcome::Stopped {
                        pid,
                        wait: self.wait_for_exit(pid),
                    }
                }
                Err(SignalError::NoSuchProcess) => StopOutcome::Stale {
                    pid,
                    reason: StaleReason::NotFound,
                },
                Err(SignalError::PermissionDenied) => {
                    return Err(SupervisorError::SignalDenied { pid });
                }
                Err(SignalError::Other(message)) => {
                    return Err(SupervisorError::Signal { pid, message });
                }
            },
        };

        self.pid_file.remove()?;
        Ok(outcome)
    }

    fn liveness(&self, record: &PidRecord) -> Liveness {
        if !self.process.is_alive(record.pid) {
            return Liveness::Stale(StaleReason::NotFound);
        }
        match (record.start_token, self.process.start_token(record.pid)) {
            (Some(recorded), Some(current)) if recorded != current => {
                tracing::debug!(pid = record.pid, recorded, current, "PID was reused");
                Liveness::Stale(StaleReason::Reused)
            }
            _ => Liveness::Alive,
        }
    }

    fn wait_for_exit(&self, pid: u64) -> StopWait {
        if self.bot.stop_timeout_secs == 0 {
            return StopWait::NotWaited;
        }
        let deadline = Instant::now() + Duration::from_secs(self.bot.stop_timeout_secs);
        loop {
            if !self.process.is_alive(pid) {
                return StopWait::Exited;
            }
            if Instant::now() >= deadline {
                return StopWait::TimedOut;
            }
            thread::sleep(EXIT_POLL_INTERVAL);
        }
    }
}

/// Creates or truncates the bot's log file.
fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| SupervisorError::io(parent, e))?;
    }
    File::create(path).map_err(|e| SupervisorError::io(path, e))
}
