use std::fmt;

#[allow(clippy::upper_case_acronyms)]
#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    FEAT,
    PWD,
    TYPE,
    PASV,
    MLSD,
    RETR,
    STOR,
    SYST,
    NOOP,
    QUIT,
    CWD,
    CDUP,
    INVALID,
}

impl FtpCommand {
    /// Exact, case-sensitive lookup. Unknown names map to `INVALID`.
    pub fn from_name(name: &str) -> FtpCommand {
        match name {
            "USER" => FtpCommand::USER,
            "PASS" => FtpCommand::PASS,
            "FEAT" => FtpCommand::FEAT,
            "PWD" => FtpCommand::PWD,
            "TYPE" => FtpCommand::TYPE,
            "PASV" => FtpCommand::PASV,
            "MLSD" => FtpCommand::MLSD,
            "RETR" => FtpCommand::RETR,
            "STOR" => FtpCommand::STOR,
            "SYST" => FtpCommand::SYST,
            "NOOP" => FtpCommand::NOOP,
            "QUIT" => FtpCommand::QUIT,
            "CWD" => FtpCommand::CWD,
            "CDUP" => FtpCommand::CDUP,
            _ => FtpCommand::INVALID,
        }
    }

    /// Whether the command moves bytes over the data connection.
    pub fn needs_data_connection(&self) -> bool {
        matches!(self, FtpCommand::MLSD | FtpCommand::RETR | FtpCommand::STOR)
    }
}

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    kind: FtpCommand,
    arg: String,
}

impl Command {
    /// Splits `line` at its first space into name and argument.
    pub fn parse(line: &str) -> Self {
        let (name, arg) = line.split_once(' ').unwrap_or((line, ""));
        Self {
            name: name.to_string(),
            kind: FtpCommand::from_name(name),
            arg: arg.to_string(),
        }
    }

    pub fn kind(&self) -> FtpCommand {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Argument text, empty when none was given.
    pub fn arg(&self) -> &str {
        &self.arg
    }

    pub fn has_arg(&self) -> bool {
        !self.arg.is_empty()
    }

    /// The command as safe to log: `PASS` arguments are masked.
    pub fn redacted(&self) -> String {
        match self.kind {
            FtpCommand::PASS => String::from("PASS ****"),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arg.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.name, self.arg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_at_first_space() {
        let cmd = Command::parse("STOR my file.txt");
        assert_eq!(cmd.kind(), FtpCommand::STOR);
        assert_eq!(cmd.arg(), "my file.txt");

        let cmd = Command::parse("PWD");
        assert_eq!(cmd.kind(), FtpCommand::PWD);
        assert!(!cmd.has_arg());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert_eq!(Command::parse("user alice").kind(), FtpCommand::INVALID);
        assert_eq!(Command::parse("Pasv").kind(), FtpCommand::INVALID);
        assert_eq!(Command::parse("USER alice").kind(), FtpCommand::USER);
        assert_eq!(Command::parse("").kind(), FtpCommand::INVALID);
    }

    #[test]
    fn test_display_reproduces_line() {
        for line in ["USER alice", "PASV", "RETR a b", "XYZ 1", "TYPE I"] {
            let cmd = Command::parse(line);
            assert_eq!(cmd.to_string(), line);
            assert_eq!(Command::parse(&cmd.to_string()), cmd);
        }
    }

    #[test]
    fn test_redacted_hides_password() {
        assert_eq!(Command::parse("PASS hunter2").redacted(), "PASS ****");
        assert_eq!(Command::parse("USER bob").redacted(), "USER bob");
    }
}
