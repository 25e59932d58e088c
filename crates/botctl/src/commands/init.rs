use std::path::Path;

use botctl_core::config;

/// Writes a commented `botctl.toml` to the current directory.
///
/// An existing file is left alone unless `force` is set.
pub fn execute(force: bool) {
    let path = config::local_config_path();
    write_config(&path, force);
}

fn write_config(path: &Path, force: bool) {
    if path.exists() && !force {
        println!(
            "Already exists: {} (use --force to overwrite)",
            path.display()
        );
        return;
    }

    match std::fs::write(path, config::template::generate_config()) {
        Ok(()) => println!("Created {}", path.display()),
        Err(e) => {
            eprintln!("Error: could not write {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}
