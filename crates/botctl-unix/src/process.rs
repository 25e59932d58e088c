use std::fs::File;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

use botctl_core::{LaunchSpec, ProcessControl, SignalError};

use crate::proc_stat;

/// Process control through POSIX signals and `/proc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixProcess;

impl ProcessControl for UnixProcess {
    fn spawn_detached(&self, spec: &LaunchSpec, log: File) -> std::io::Result<u64> {
        spawn_detached(spec, log)
    }

    fn is_alive(&self, pid: u64) -> bool {
        is_process_alive(pid)
    }

    fn start_token(&self, pid: u64) -> Option<u64> {
        to_pid(pid).and_then(|p| proc_stat::read(p.as_raw()).map(|s| s.start_time))
    }

    fn terminate(&self, pid: u64) -> Result<(), SignalError> {
        terminate(pid)
    }
}

/// Converts a recorded PID to a signal target.
///
/// Only positive values that fit a `pid_t` name a single process; `0` and
/// negative values would address process groups.
fn to_pid(pid: u64) -> Option<Pid> {
    i32::try_from(pid)
        .ok()
        .filter(|p| *p > 0)
        .map(Pid::from_raw)
}

/// Launches the bot in a new session with stdin from `/dev/null` and
/// stdout and stderr both written to `log`.
///
/// The new session detaches it from the controlling terminal, so closing
/// the terminal or pressing Ctrl+C in it does not reach the bot. The child
/// handle is dropped without waiting.
pub fn spawn_detached(spec: &LaunchSpec, log: File) -> std::io::Result<u64> {
    let stderr = log.try_clone()?;

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(stderr));

    // SAFETY: pre_exec runs in the forked child before exec. setsid only
    // makes a system call and touches no memory shared with the parent.
    unsafe {
        cmd.pre_exec(|| {
            nix::unistd::setsid()
                .map(|_| ())
                .map_err(std::io::Error::from)
        });
    }

    let child = cmd.spawn()?;
    let pid = child.id();
    tracing::debug!(pid, program = %spec.program, "spawned detached process");
    Ok(u64::from(pid))
}

/// Checks whether a process with the given PID exists.
///
/// Sends signal 0 via `kill(2)`, which checks existence without delivering
/// anything. `EPERM` means the process exists but belongs to another user.
/// On Linux, zombies (exited but not yet reaped) count as gone.
pub fn is_process_alive(pid: u64) -> bool {
    let Some(target) = to_pid(pid) else {
        return false;
    };
    match kill(target, None) {
        Ok(()) | Err(Errno::EPERM) => {
            !proc_stat::read(target.as_raw()).is_some_and(|s| s.is_zombie())
        }
        Err(_) => false,
    }
}

/// Sends `SIGTERM`.
pub fn terminate(pid: u64) -> Result<(), SignalError> {
    let Some(target) = to_pid(pid) else {
        return Err(SignalError::NoSuchProcess);
    };
    match kill(target, Signal::SIGTERM) {
        Ok(()) => Ok(()),
        Err(Errno::ESRCH) => Err(SignalError::NoSuchProcess),
        Err(Errno::EPERM) => Err(SignalError::PermissionDenied),
        Err(e) => Err(SignalError::Other(e.desc().to_string())),
    }
}
