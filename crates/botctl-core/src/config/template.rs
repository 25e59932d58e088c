//! Commented default config file written by `botctl init`.

use super::BotConfig;

/// Generates the default `botctl.toml` with every option explained.
///
/// Values come from [`BotConfig::default`] so the template never drifts
/// from the built-in defaults.
pub fn generate_config() -> String {
    let bot = BotConfig::default();
    let args = bot
        .args
        .iter()
        .map(|a| format!("{a:?}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"# botctl configuration
#
# Paths are relative to the directory botctl is run from.

[bot]
# Executable to launch. Looked up through PATH.
program = {program:?}

# Arguments passed to the program.
args = [{args}]

# File holding the PID of the running bot.
pid_file = {pid_file:?}

# Combined stdout/stderr of the bot. Truncated on every start.
log_file = {log_file:?}

# Seconds `botctl stop` waits for the bot to exit after SIGTERM.
# 0 returns immediately. Maximum 300.
stop_timeout_secs = {timeout}

[log]
# Verbosity of botctl's own diagnostics on stderr:
# "trace", "debug", "info", "warn", or "error".
# The BOTCTL_LOG environment variable overrides this.
level = "warn"
"#,
        program = bot.program,
        pid_file = bot.pid_file.display().to_string(),
        log_file = bot.log_file.display().to_string(),
        timeout = bot.stop_timeout_secs,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn template_parses_to_default_config() {
        // Act
        let config: Config = toml::from_str(&generate_config()).unwrap();

        // Assert
        let defaults = BotConfig::default();
        assert_eq!(config.bot.program, defaults.program);
        assert_eq!(config.bot.args, defaults.args);
        assert_eq!(config.bot.pid_file, defaults.pid_file);
        assert_eq!(config.bot.log_file, defaults.log_file);
        assert_eq!(config.log.level, "warn");
    }
}
