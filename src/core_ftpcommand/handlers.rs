use crate::core_ftpcommand::ftpcommand::{Command, FtpCommand};
use crate::core_ftpcommand::{
    cdup, cwd, feat, mlsd, noop, pass, pwd, quit, retr, stor, syst, type_, user,
};
use crate::core_network::pasv;
use crate::core_protocol::{Response, SessionError};
use crate::core_transfer::DataResponse;
use crate::session::Session;

/// What the session loop does with a handled command.
#[derive(Debug)]
pub enum Action {
    /// Send the reply and read the next command.
    Reply(Response),
    /// Send the `227` reply, then wait for the client's data connection.
    Passive(Response),
    /// Send the `150` reply, run the transfer, then report how it went.
    Transfer(DataResponse),
    /// Send the reply and end the session.
    Close(Response),
}

pub fn reply(code: u16, message: &str) -> Action {
    Action::Reply(Response::new(code, message))
}

/// Routes one command from a logged-in client to its handler.
pub async fn dispatch(session: &mut Session, command: &Command) -> Result<Action, SessionError> {
    session.user()?;

    if command.kind().needs_data_connection() && !session.dtp.has_connection() {
        return Ok(reply(425, "Use PORT or PASV first."));
    }

    match command.kind() {
        FtpCommand::USER => Ok(user::handle_user_command()),
        FtpCommand::PASS => Ok(pass::handle_pass_command()),
        FtpCommand::FEAT => Ok(feat::handle_feat_command(command)),
        FtpCommand::SYST => Ok(syst::handle_syst_command()),
        FtpCommand::NOOP => Ok(noop::handle_noop_command()),
        FtpCommand::QUIT => Ok(quit::handle_quit_command()),
        FtpCommand::PWD => pwd::handle_pwd_command(session, command),
        FtpCommand::TYPE => Ok(type_::handle_type_command(session, command)),
        FtpCommand::CWD => cwd::handle_cwd_command(session, command),
        FtpCommand::CDUP => cdup::handle_cdup_command(session),
        FtpCommand::PASV => Ok(pasv::handle_pasv_command(session, command).await),
        FtpCommand::MLSD => mlsd::handle_mlsd_command(session, command).await,
        FtpCommand::RETR => retr::handle_retr_command(session, command).await,
        FtpCommand::STOR => stor::handle_stor_command(session, command),
        FtpCommand::INVALID => Ok(reply(500, "Unknown command.")),
    }
}
