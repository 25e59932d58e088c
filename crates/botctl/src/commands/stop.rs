use botctl_core::{StaleReason, StopOutcome, StopWait};

pub fn execute(config: Option<&std::path::Path>) {
    let supervisor = super::supervisor(config);

    let outcome = match supervisor.stop() {
        Ok(outcome) => outcome,
        Err(e) => super::fail(&e),
    };

    match outcome {
        StopOutcome::NotRunning => println!("Bot is not running."),
        StopOutcome::Stopped { pid, wait } => match wait {
            StopWait::NotWaited => println!("Bot stopped (sent SIGTERM to PID {pid})."),
            StopWait::Exited => println!("Bot stopped (PID {pid} exited)."),
            StopWait::TimedOut => println!(
                "Warning: sent SIGTERM to PID {pid} but it was still running after {}s.",
                supervisor.config().stop_timeout_secs
            ),
        },
        StopOutcome::Stale { pid, reason } => {
            let note = match reason {
                StaleReason::NotFound => "",
                StaleReason::Reused => ", the PID now belongs to another process",
            };
            println!("Warning: no matching process found (PID: {pid}{note}); removed PID file.");
        }
        StopOutcome::Invalid { reason } => {
            println!("Warning: PID file held no valid PID ({reason}); removed it.");
        }
    }
}
