//! The PID record: which process the supervisor believes is the bot.
//!
//! `bot.pid` holds the decimal PID and nothing else, so it can be read
//! or written by hand. A sidecar `bot.pid.meta` (TOML) adds the launch
//! time and a start token used to notice PID reuse. The sidecar is only
//! trusted when its `pid` matches `bot.pid`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SupervisorError};

const META_SUFFIX: &str = ".meta";

/// A PID read from or written to the PID file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PidRecord {
    pub pid: u64,
    /// Unix seconds at which `start` launched the process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<u64>,
    /// Process start token captured at launch, see
    /// [`ProcessControl::start_token`](crate::ProcessControl::start_token).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_token: Option<u64>,
}

impl PidRecord {
    /// A record with only a PID, as found in a hand-written PID file.
    pub fn bare(pid: u64) -> Self {
        Self {
            pid,
            started_at: None,
            start_token: None,
        }
    }

    /// Seconds since launch, if the launch time is known.
    pub fn uptime_secs(&self) -> Option<u64> {
        self.started_at
            .map(|started| now_unix_secs().saturating_sub(started))
    }
}

/// Location of the PID file and its sidecar.
#[derive(Debug, Clone)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the metadata sidecar: the PID file path plus `.meta`.
    pub fn meta_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(META_SUFFIX);
        PathBuf::from(name)
    }

    /// Directory holding the PID file, used as the lock target.
    pub fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Reads the record, if the PID file exists.
    ///
    /// Returns [`SupervisorError::InvalidRecord`] when the file holds
    /// anything but a positive integer. A missing, unreadable, or
    /// mismatched sidecar is ignored.
    pub fn read(&self) -> Result<Option<PidRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SupervisorError::io(&self.path, e)),
        };

        let pid = parse_pid(&contents).map_err(|reason| SupervisorError::InvalidRecord {
            path: self.path.clone(),
            reason,
        })?;

        let record = match self.read_meta() {
            Some(meta) if meta.pid == pid => meta,
            Some(meta) => {
                tracing::debug!(
                    pid,
                    meta_pid = meta.pid,
                    "ignoring metadata for a different PID"
                );
                PidRecord::bare(pid)
            }
            None => PidRecord::bare(pid),
        };
        Ok(Some(record))
    }

    /// Writes the record, overwriting any previous contents.
    ///
    /// The sidecar is written first so that a reader never sees a new PID
    /// paired with the previous launch's metadata.
    pub fn write(&self, record: &PidRecord) -> Result<()> {
        let meta_path = self.meta_path();
        let meta = toml::to_string(record).map_err(|e| {
            SupervisorError::io(&meta_path, std::io::Error::new(ErrorKind::InvalidData, e))
        })?;
        fs::write(&meta_path, meta).map_err(|e| SupervisorError::io(&meta_path, e))?;
        fs::write(&self.path, record.pid.to_string())
            .map_err(|e| SupervisorError::io(&self.path, e))?;
        Ok(())
    }

    /// Removes the PID file and its sidecar. Missing files are not an error.
    pub fn remove(&self) -> Result<()> {
        remove_if_present(&self.path)?;
        remove_if_present(&self.meta_path())
    }

    fn read_meta(&self) -> Option<PidRecord> {
        let path = self.meta_path();
        let content = fs::read_to_string(&path).ok()?;
        match toml::from_str(&content) {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::debug!(path = %path.display(), "unreadable PID metadata: {e}");
                None
            }
        }
    }
}

/// Parses PID file contents: one positive decimal integer, surrounding
/// whitespace allowed.
pub fn parse_pid(contents: &str) -> std::result::Result<u64, String> {
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return Err("file is empty".into());
    }
    match trimmed.parse::<u64>() {
        Ok(0) => Err("PID 0 does not name a process".into()),
        Ok(pid) => Ok(pid),
        Err(_) => Err(format!("expected a process ID, found {trimmed:?}")),
    }
}

/// Current time as Unix seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SupervisorError::io(path, e)),
    }
}
