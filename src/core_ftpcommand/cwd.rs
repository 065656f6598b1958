use crate::core_ftpcommand::ftpcommand::Command;
use crate::core_ftpcommand::handlers::{reply, Action};
use crate::core_protocol::SessionError;
use crate::session::Session;
use log::{info, warn};

/// Handles the CWD command.
///
/// A leading `/` is taken from the user's home, anything else from the
/// current directory. The target must be a directory inside the home.
pub fn handle_cwd_command(
    session: &mut Session,
    command: &Command,
) -> Result<Action, SessionError> {
    if !command.has_arg() {
        return Ok(reply(501, "Syntax error in parameters or arguments."));
    }

    let home = session.home()?;
    let base = session.base_for(command.arg())?;
    match base.resolve_within(home, command.arg()) {
        Ok(target) if target.is_dir() => {
            let shown = target.display_from(home);
            session.set_cwd(target)?;
            info!("Directory changed to {}", shown);
            Ok(reply(250, "Directory successfully changed."))
        }
        Ok(_) => Ok(reply(550, "Failed to change directory.")),
        Err(e) => {
            warn!("CWD {:?} refused: {}", command.arg(), e);
            Ok(reply(550, "Failed to change directory."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_ftpcommand::handlers::test_support::{code_of, logged_in};
    use tempfile::TempDir;

    #[test]
    fn test_cwd_stays_inside_home() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
        std::fs::write(dir.path().join("file"), b"x").unwrap();
        let mut session = logged_in(&dir);

        let cwd = |s: &mut Session, line: &str| {
            code_of(&handle_cwd_command(s, &Command::parse(line)).unwrap())
        };

        assert_eq!(cwd(&mut session, "CWD a"), 250);
        assert_eq!(cwd(&mut session, "CWD b"), 250);
        assert_eq!(session.cwd().unwrap().display_from(session.home().unwrap()), "/a/b");
        assert_eq!(cwd(&mut session, "CWD ../../.."), 550);
        assert_eq!(cwd(&mut session, "CWD /file"), 550);
        assert_eq!(cwd(&mut session, "CWD missing"), 550);
        assert_eq!(cwd(&mut session, "CWD"), 501);
        assert_eq!(cwd(&mut session, "CWD /"), 250);
        assert_eq!(session.cwd().unwrap(), session.home().unwrap());
    }
}
