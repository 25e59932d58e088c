use std::path::{Path, PathBuf};

use super::{Config, LOCAL_CONFIG_FILE};
use crate::error::{Result, SupervisorError};

/// Returns the user config directory: `~/.config/botctl/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("botctl"))
}

/// Returns the user config file path: `~/.config/botctl/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Returns the per-directory config file path: `./botctl.toml`.
pub fn local_config_path() -> PathBuf {
    PathBuf::from(LOCAL_CONFIG_FILE)
}

/// Picks the config file to use, if any.
///
/// An explicit path always wins. Otherwise `./botctl.toml` is preferred
/// over the user config. Returns `None` when neither file exists.
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = local_config_path();
    if local.is_file() {
        return Some(local);
    }
    user_config_path().filter(|p| p.is_file())
}

/// Reads and parses a config file, then clamps it via [`Config::validate`].
pub fn load_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SupervisorError::Config(format!("{}: {e}", path.display())))?;
    let mut config: Config = toml::from_str(&content)
        .map_err(|e| SupervisorError::Config(format!("{}: {e}", path.display())))?;
    config.validate();
    Ok(config)
}

/// Loads the configuration, falling back to defaults when no file exists.
///
/// A file that exists but cannot be read or parsed is an error, unlike
/// a missing file.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    match resolve_path(explicit) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            load_from(&path)
        }
        None => {
            tracing::debug!("no config file found, using defaults");
            Ok(Config::default())
        }
    }
}
