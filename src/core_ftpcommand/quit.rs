use crate::core_ftpcommand::handlers::Action;
use crate::core_protocol::Response;
use log::info;

pub fn quit_response() -> Response {
    Response::new(221, "Goodbye.")
}

/// Handles the QUIT FTP command. The session ends once the reply is sent.
pub fn handle_quit_command() -> Action {
    info!("Received QUIT command. Closing connection.");
    Action::Close(quit_response())
}
