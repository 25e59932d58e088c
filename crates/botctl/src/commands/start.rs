pub fn execute(config: Option<&std::path::Path>) {
    let supervisor = super::supervisor(config);

    match supervisor.start() {
        Ok(started) => {
            if let Some(stale) = started.replaced_stale {
                println!("Replaced stale PID file (process {stale} was not running).");
            }
            println!(
                "Bot started (PID: {}). Output goes to {}.",
                started.pid,
                started.log_file.display()
            );
        }
        Err(e) => super::fail(&e),
    }
}
