use crate::core_ftpcommand::handlers::{reply, Action};
use log::warn;

/// Handles USER after login. Switching to another account is not supported.
pub fn handle_user_command() -> Action {
    warn!("USER received from an already logged-in client");
    reply(503, "Cannot change user.")
}
