use std::path::PathBuf;

/// The fields of `/proc/<pid>/stat` that botctl uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcStat {
    /// Single-letter scheduler state, e.g. `R`, `S`, `Z`.
    pub state: char,
    /// Clock ticks after boot at which the process started (field 22).
    pub start_time: u64,
}

impl ProcStat {
    pub fn is_zombie(&self) -> bool {
        matches!(self.state, 'Z' | 'X')
    }
}

/// Reads `/proc/<pid>/stat`. Returns `None` off Linux, for exited
/// processes, and for unparsable contents.
pub fn read(pid: i32) -> Option<ProcStat> {
    if !cfg!(target_os = "linux") {
        return None;
    }
    let path = PathBuf::from("/proc").join(pid.to_string()).join("stat");
    let content = std::fs::read_to_string(path).ok()?;
    parse(&content)
}

/// Parses the contents of a `stat` file.
///
/// The command name (field 2) is parenthesised and may itself contain
/// spaces and parentheses, so fields are counted from the last `)`.
pub fn parse(content: &str) -> Option<ProcStat> {
    let rest = &content[content.rfind(')')? + 1..];
    let mut fields = rest.split_whitespace();
    let state = fields.next()?.chars().next()?;
    // After `state` (field 3), start_time is field 22: skip fields 4..=21.
    let start_time = fields.nth(18)?.parse().ok()?;
    Some(ProcStat { state, start_time })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLEEP_STAT: &str = "4242 (sleep) S 1 4242 4242 0 -1 4194560 93 0 0 0 0 0 0 0 20 0 1 0 8675309 5689344 132 18446744073709551615 1 1 0 0 0 0 0 0 0 0 0 0 17 3 0 0 0 0 0";

    #[test]
    fn parses_state_and_start_time() {
        // Act
        let stat = parse(SLEEP_STAT).unwrap();

        // Assert
        assert_eq!(stat.state, 'S');
        assert_eq!(stat.start_time, 8_675_309);
        assert!(!stat.is_zombie());
    }

    #[test]
    fn command_names_with_spaces_and_parens_are_skipped() {
        // Arrange
        let content = SLEEP_STAT.replace("(sleep) S", "(my (odd) bot) Z");

        // Act
        let stat = parse(&content).unwrap();

        // Assert
        assert_eq!(stat.state, 'Z');
        assert_eq!(stat.start_time, 8_675_309);
        assert!(stat.is_zombie());
    }

    #[test]
    fn truncated_contents_do_not_parse() {
        assert_eq!(parse("4242 (sleep) S 1 4242"), None);
        assert_eq!(parse("garbage"), None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn reads_own_stat() {
        // Arrange
        let pid = i32::try_from(std::process::id()).unwrap();

        // Act
        let stat = read(pid).unwrap();

        // Assert
        assert!(!stat.is_zombie());
        assert!(stat.start_time > 0);
    }
}
