use crate::core_ftpcommand::ftpcommand::Command;
use crate::core_ftpcommand::handlers::{reply, Action};
use crate::core_protocol::{Response, SessionError};
use crate::core_transfer::{DataResponse, FileStreamReader, Transfer};
use crate::session::Session;
use log::{info, warn};

/// Handles the STOR (Store) FTP command.
///
/// The target is created in the current directory and must not exist yet.
/// Only a plain file name is accepted.
pub fn handle_stor_command(
    session: &mut Session,
    command: &Command,
) -> Result<Action, SessionError> {
    if !command.has_arg() {
        warn!("STOR command received with no arguments");
        return Ok(reply(501, "Syntax error in parameters or arguments."));
    }

    let (path, file) = match session.cwd()?.create_file_under(command.arg()) {
        Ok(created) => created,
        Err(e) => {
            warn!("STOR {:?} refused: {}", command.arg(), e);
            let (code, message) = e.to_ftp_response();
            return Ok(reply(code, message));
        }
    };
    info!("Receiving file {:?}", path.display_from(session.home()?));

    Ok(Action::Transfer(DataResponse::new(
        Response::new(150, "Ok to send data."),
        Transfer::Store(FileStreamReader::new(file)),
    )))
}
