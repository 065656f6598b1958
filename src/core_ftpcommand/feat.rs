use crate::constants::FEATURES;
use crate::core_ftpcommand::ftpcommand::Command;
use crate::core_ftpcommand::handlers::{reply, Action};
use crate::core_protocol::Response;

/// The multi-line `211` reply listing the supported extensions.
pub fn features_response() -> Response {
    let mut text = String::from("211-Features\r\n");
    for feature in FEATURES {
        text.push(' ');
        text.push_str(feature);
        text.push_str("\r\n");
    }
    text.push_str("211 End\r\n");
    Response::preformatted(211, &text)
}

/// Handles the FEAT command, which takes no argument.
pub fn handle_feat_command(command: &Command) -> Action {
    if command.has_arg() {
        return reply(501, "Invalid command.");
    }
    Action::Reply(features_response())
}
