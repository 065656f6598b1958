use crate::core_ftpcommand::handlers::{reply, Action};

pub fn handle_noop_command() -> Action {
    reply(200, "NOOP ok.")
}
