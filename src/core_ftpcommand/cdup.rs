use crate::core_ftpcommand::handlers::{reply, Action};
use crate::core_protocol::SessionError;
use crate::session::Session;

/// Handles the CDUP command. At the home directory it is a no-op.
pub fn handle_cdup_command(session: &mut Session) -> Result<Action, SessionError> {
    let parent = session.cwd()?.parent_within(session.home()?);
    session.set_cwd(parent)?;
    Ok(reply(250, "Directory successfully changed."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_ftpcommand::handlers::test_support::logged_in;
    use tempfile::TempDir;

    #[test]
    fn test_cdup_clamps_at_home() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let mut session = logged_in(&dir);
        let sub = session.home().unwrap().resolve("sub").unwrap();
        session.set_cwd(sub).unwrap();

        handle_cdup_command(&mut session).unwrap();
        assert_eq!(session.cwd().unwrap(), session.home().unwrap());
        handle_cdup_command(&mut session).unwrap();
        assert_eq!(session.cwd().unwrap(), session.home().unwrap());
    }
}
