use crate::core_ftpcommand::ftpcommand::Command;
use crate::core_ftpcommand::handlers::{reply, Action};
use crate::core_protocol::Response;
use crate::helpers::format_pasv_address;
use crate::session::Session;
use log::{debug, error};

/// Handles the PASV command.
///
/// Opens the passive listener and answers `227` with its address. The session
/// loop waits for the data connection once the reply is out.
pub async fn handle_pasv_command(session: &mut Session, command: &Command) -> Action {
    if command.has_arg() {
        return reply(501, "Invalid command.");
    }

    match session.dtp.passive_begin().await {
        Ok(addr) => {
            let message = format!("Entering Passive Mode ({}).", format_pasv_address(addr));
            debug!("PASV response: {}", message);
            Action::Passive(Response::new(227, &message))
        }
        Err(e) => {
            error!("Failed to enter passive mode: {}", e);
            let (code, message) = e.to_ftp_response();
            reply(code, message)
        }
    }
}
