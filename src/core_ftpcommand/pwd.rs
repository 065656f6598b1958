use crate::core_ftpcommand::ftpcommand::Command;
use crate::core_ftpcommand::handlers::{reply, Action};
use crate::core_protocol::SessionError;
use crate::helpers::quote_pathname;
use crate::session::Session;

/// Handles the PWD command.
///
/// The working directory is shown relative to the user's home, which the
/// client sees as `/`.
pub fn handle_pwd_command(session: &Session, command: &Command) -> Result<Action, SessionError> {
    if command.has_arg() {
        return Ok(reply(501, "Invalid command."));
    }
    let current = session.cwd()?.display_from(session.home()?);
    Ok(reply(257, &quote_pathname(&current)))
}
