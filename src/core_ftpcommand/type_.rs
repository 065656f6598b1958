use crate::core_ftpcommand::ftpcommand::Command;
use crate::core_ftpcommand::handlers::{reply, Action};
use crate::session::{RepresentationType, Session};

/// Handles the TYPE command. Only `A` (ASCII) and `I` (binary) are accepted.
///
/// The type is recorded for the session; file data is always sent unchanged.
pub fn handle_type_command(session: &mut Session, command: &Command) -> Action {
    match command.arg() {
        "A" => {
            session.repr_type = RepresentationType::Ascii;
            reply(200, "Switching to ASCII mode.")
        }
        "I" => {
            session.repr_type = RepresentationType::Image;
            reply(200, "Switching to binary mode.")
        }
        _ => reply(500, "Invalid command."),
    }
}
