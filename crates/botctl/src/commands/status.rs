use botctl_core::{StaleReason, Status};

pub fn execute(config: Option<&std::path::Path>, json: bool) {
    let supervisor = super::supervisor(config);

    let status = match supervisor.status() {
        Ok(status) => status,
        Err(e) => super::fail(&e),
    };

    if json {
        print_json(&status, supervisor.pid_file().path());
        return;
    }

    match status {
        Status::NotRunning => println!("Bot is not running."),
        Status::Running {
            pid,
            uptime_secs: Some(secs),
        } => println!("Bot is running (PID: {pid}, up {}).", format_uptime(secs)),
        Status::Running { pid, .. } => println!("Bot is running (PID: {pid})."),
        Status::Stale { pid, reason } => println!("{}", stale_warning(pid, reason)),
    }
}

fn stale_warning(pid: u64, reason: StaleReason) -> String {
    match reason {
        StaleReason::NotFound => {
            format!("Warning: PID file is stale, process not found (PID: {pid}).")
        }
        StaleReason::Reused => {
            format!("Warning: PID file is stale, PID {pid} now belongs to another process.")
        }
    }
}

fn print_json(status: &Status, pid_file: &std::path::Path) {
    let mut value = match serde_json::to_value(status) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error: could not serialize status: {e}");
            std::process::exit(1);
        }
    };
    if let Some(obj) = value.as_object_mut() {
        obj.insert(
            "pid_file".into(),
            serde_json::Value::String(pid_file.display().to_string()),
        );
    }
    println!("{value}");
}

/// Formats seconds as `1d 2h 3m 4s`, dropping leading zero units.
fn format_uptime(secs: u64) -> String {
    let (d, h, m, s) = (secs / 86_400, secs / 3600 % 24, secs / 60 % 60, secs % 60);
    match (d, h, m) {
        (0, 0, 0) => format!("{s}s"),
        (0, 0, _) => format!("{m}m {s}s"),
        (0, _, _) => format!("{h}h {m}m {s}s"),
        _ => format!("{d}d {h}h {m}m {s}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_drops_leading_zero_units() {
        assert_eq!(format_uptime(0), "0s");
        assert_eq!(format_uptime(59), "59s");
        assert_eq!(format_uptime(61), "1m 1s");
        assert_eq!(format_uptime(3600), "1h 0m 0s");
        assert_eq!(format_uptime(90_061), "1d 1h 1m 1s");
    }

    #[test]
    fn stale_warning_names_the_reason() {
        // Act
        let not_found = stale_warning(42, StaleReason::NotFound);
        let reused = stale_warning(42, StaleReason::Reused);

        // Assert
        assert_eq!(
            not_found,
            "Warning: PID file is stale, process not found (PID: 42)."
        );
        assert_eq!(
            reused,
            "Warning: PID file is stale, PID 42 now belongs to another process."
        );
        assert!(!reused.contains("not found"));
    }
}
