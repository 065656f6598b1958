use crate::core_auth::{User, UserDirectory};
use crate::core_ftpcommand::ftpcommand::{Command, FtpCommand};
use crate::core_ftpcommand::quit::quit_response;
use crate::core_protocol::error::SessionError;
use crate::core_protocol::framer::{Frame, LineFramer};
use crate::core_protocol::login::LoginMachine;
use crate::core_protocol::response::{ReplySink, Response};
use log::debug;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

/// Protocol Interpreter: owns the control connection.
///
/// Commands are read strictly one at a time. The next line is only read
/// after the reply to the previous one has been written out completely.
#[derive(Debug)]
pub struct ProtocolInterpreter<S> {
    control: S,
    framer: LineFramer,
    sink: ReplySink,
}

impl<S> ProtocolInterpreter<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(control: S) -> Self {
        Self {
            control,
            framer: LineFramer::default(),
            sink: ReplySink::default(),
        }
    }

    pub async fn send(&mut self, response: &mut Response) -> Result<(), SessionError> {
        self.sink.send(&mut self.control, response).await
    }

    pub async fn reply(&mut self, code: u16, message: &str) -> Result<(), SessionError> {
        self.send(&mut Response::new(code, message)).await
    }

    /// Reads the next command. `Ok(None)` means the client closed the
    /// connection. Lines that overflow the input buffer are answered with
    /// `500` and skipped.
    pub async fn next_command(&mut self) -> Result<Option<Command>, SessionError> {
        loop {
            match self.framer.read_frame(&mut self.control).await? {
                None => return Ok(None),
                Some(Frame::Overflow) => {
                    self.reply(500, "Command line too long.").await?;
                }
                Some(Frame::Line(line)) => {
                    let command = Command::parse(&line);
                    debug!("Command: {}", command.redacted());
                    return Ok(Some(command));
                }
            }
        }
    }

    /// Runs the USER/PASS exchange until a user is logged in. Returns `None`
    /// when the client quits or disconnects first.
    pub async fn login(
        &mut self,
        users: &UserDirectory,
    ) -> Result<Option<Arc<User>>, SessionError> {
        let mut machine = LoginMachine::new();
        while let Some(command) = self.next_command().await? {
            if command.kind() == FtpCommand::QUIT {
                self.send(&mut quit_response()).await?;
                return Ok(None);
            }
            let mut response = machine.handle(&command, users)?;
            self.send(&mut response).await?;
            if let Some(user) = machine.reply_sent()? {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }
}
