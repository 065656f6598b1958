use crate::core_ftpcommand::ftpcommand::Command;
use crate::core_ftpcommand::handlers::{reply, Action};
use crate::core_protocol::{Response, SessionError};
use crate::core_transfer::{DataResponse, DirectoryListingWriter, Transfer};
use crate::session::Session;
use log::error;

/// Handles the MLSD command: lists the current directory over the data
/// connection. Listing another directory by argument is not supported.
pub async fn handle_mlsd_command(
    session: &mut Session,
    command: &Command,
) -> Result<Action, SessionError> {
    if command.has_arg() {
        return Ok(reply(501, "Invalid command."));
    }

    let listing = match DirectoryListingWriter::new(session.cwd()?).await {
        Ok(listing) => listing,
        Err(e) => {
            error!("Failed to read directory: {}", e);
            return Ok(reply(550, "Failed to open directory."));
        }
    };
    Ok(Action::Transfer(DataResponse::new(
        Response::new(150, "Here comes the directory listing."),
        Transfer::Listing(listing),
    )))
}
