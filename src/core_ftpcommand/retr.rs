use crate::core_ftpcommand::ftpcommand::Command;
use crate::core_ftpcommand::handlers::{reply, Action};
use crate::core_protocol::{Response, SessionError};
use crate::core_transfer::{DataResponse, FileStreamWriter, Transfer};
use crate::session::Session;
use log::{error, info, warn};

/// Handles the RETR (Retrieve) FTP command.
///
/// A leading `/` is taken from the user's home, anything else from the
/// current directory. The name must stay inside the home and name a regular
/// file.
pub async fn handle_retr_command(
    session: &mut Session,
    command: &Command,
) -> Result<Action, SessionError> {
    if !command.has_arg() {
        warn!("RETR command received with no arguments");
        return Ok(reply(501, "Syntax error in parameters or arguments."));
    }

    let home = session.home()?;
    let base = session.base_for(command.arg())?;
    let path = match base.resolve_within(home, command.arg()) {
        Ok(path) if path.is_file() => path,
        Ok(_) => return Ok(reply(550, "Failed to open file.")),
        Err(e) => {
            let (code, message) = e.to_ftp_response();
            return Ok(reply(code, message));
        }
    };

    let writer = match FileStreamWriter::open(&path).await {
        Ok(writer) => writer,
        Err(e) => {
            error!("Failed to open {:?}: {}", command.arg(), e);
            return Ok(reply(550, "Failed to open file."));
        }
    };
    info!("Sending file {:?} ({} bytes)", command.arg(), writer.size());

    Ok(Action::Transfer(DataResponse::new(
        Response::new(
            150,
            &format!("Opening data connection for {} ({} bytes).", command.arg(), writer.size()),
        ),
        Transfer::Retrieve(writer),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_ftpcommand::cwd::handle_cwd_command;
    use crate::core_ftpcommand::handlers::test_support::{code_of, logged_in};
    use tempfile::TempDir;

    async fn retr(session: &mut Session, line: &str) -> u16 {
        code_of(&handle_retr_command(session, &Command::parse(line)).await.unwrap())
    }

    #[tokio::test]
    async fn test_retr_absolute_path_starts_at_home() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("top.txt"), b"top").unwrap();
        std::fs::write(dir.path().join("sub/inner.txt"), b"inner").unwrap();
        let mut session = logged_in(&dir);

        let moved = handle_cwd_command(&mut session, &Command::parse("CWD sub")).unwrap();
        assert_eq!(code_of(&moved), 250);

        assert_eq!(retr(&mut session, "RETR /top.txt").await, 150);
        assert_eq!(retr(&mut session, "RETR /sub/inner.txt").await, 150);
        assert_eq!(retr(&mut session, "RETR inner.txt").await, 150);
        assert_eq!(retr(&mut session, "RETR top.txt").await, 550);
        assert_eq!(retr(&mut session, "RETR /../top.txt").await, 550);
        assert_eq!(retr(&mut session, "RETR /sub").await, 550);
        assert_eq!(retr(&mut session, "RETR").await, 501);
    }
}
