pub mod init;
pub mod start;
pub mod status;
pub mod stop;

use std::path::Path;

use botctl_core::{Supervisor, SupervisorError, config};
use botctl_unix::UnixProcess;

/// Loads the configuration, starts logging, and builds the supervisor.
///
/// Exits with the error's code if the configuration cannot be loaded.
fn supervisor(config_path: Option<&Path>) -> Supervisor<UnixProcess> {
    let config = match config::load(config_path) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    crate::logging::init(&config.log.level);
    Supervisor::new(config.bot, UnixProcess)
}

/// Prints the error to stderr and exits with its exit code.
fn fail(err: &SupervisorError) -> ! {
    tracing::debug!(?err, "command failed");
    eprintln!("Error: {err}");
    std::process::exit(err.exit_code());
}
