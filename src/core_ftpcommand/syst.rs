use crate::core_ftpcommand::handlers::{reply, Action};

/// Handles the SYST (System) FTP command.
pub fn handle_syst_command() -> Action {
    reply(215, "UNIX Type: L8")
}
