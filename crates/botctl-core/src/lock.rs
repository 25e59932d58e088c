//! Advisory lock serializing start/status/stop invocations.
//!
//! The lock is taken on the directory that holds the PID file rather than
//! on a dedicated lock file, so taking it never creates anything on disk.
//! It is released when the guard is dropped.

use std::fs::File;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Result, SupervisorError};

/// Holds an exclusive `flock` on a directory until dropped.
#[derive(Debug)]
pub struct StateLock {
    file: File,
    path: PathBuf,
}

impl StateLock {
    /// Blocks until the exclusive lock on `dir` is acquired.
    pub fn acquire(dir: &Path) -> Result<Self> {
        let file = File::open(dir).map_err(|e| SupervisorError::io(dir, e))?;
        file.lock_exclusive()
            .map_err(|e| SupervisorError::io(dir, e))?;
        tracing::trace!(dir = %dir.display(), "state lock acquired");
        Ok(Self {
            file,
            path: dir.to_path_buf(),
        })
    }

    /// Blocks until a shared lock on `dir` is acquired.
    ///
    /// Shared holders exclude exclusive ones but not each other.
    pub fn acquire_shared(dir: &Path) -> Result<Self> {
        let file = File::open(dir).map_err(|e| SupervisorError::io(dir, e))?;
        FileExt::lock_shared(&file).map_err(|e| SupervisorError::io(dir, e))?;
        Ok(Self {
            file,
            path: dir.to_path_buf(),
        })
    }

    /// Acquires the exclusive lock only if nobody else holds it.
    ///
    /// Returns `Ok(None)` when another invocation holds the lock.
    #[cfg(test)]
    pub(crate) fn try_acquire(dir: &Path) -> Result<Option<Self>> {
        let file = File::open(dir).map_err(|e| SupervisorError::io(dir, e))?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self {
                file,
                path: dir.to_path_buf(),
            })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(SupervisorError::io(dir, e)),
        }
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(dir = %self.path.display(), "failed to release state lock: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_lock_is_refused_while_first_is_held() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let _held = StateLock::acquire(dir.path()).unwrap();

        // Act
        let second = StateLock::try_acquire(dir.path()).unwrap();

        // Assert
        assert!(second.is_none());
    }

    #[test]
    fn shared_lock_blocks_exclusive() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let _reader = StateLock::acquire_shared(dir.path()).unwrap();

        // Act
        let writer = StateLock::try_acquire(dir.path()).unwrap();

        // Assert
        assert!(writer.is_none());
    }

    #[test]
    fn lock_is_released_on_drop() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        drop(StateLock::acquire(dir.path()).unwrap());

        // Act
        let again = StateLock::try_acquire(dir.path()).unwrap();

        // Assert
        assert!(again.is_some());
    }

    #[test]
    fn locking_creates_no_files() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();

        // Act
        let _lock = StateLock::acquire(dir.path()).unwrap();

        // Assert
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        // Act
        let err = StateLock::acquire(Path::new("/nonexistent/botctl-dir")).unwrap_err();

        // Assert
        assert!(matches!(err, SupervisorError::Io { .. }));
    }
}
