use crate::core_ftpcommand::handlers::{reply, Action};

/// Handles PASS after login, which is always out of sequence.
pub fn handle_pass_command() -> Action {
    reply(503, "Bad sequence of commands.")
}
