//! Unix implementation of [`botctl_core::ProcessControl`].

/// Signals, liveness checks, and detached spawning.
pub mod process;

/// `/proc/<pid>/stat` parsing (Linux).
pub mod proc_stat;

pub use process::UnixProcess;
