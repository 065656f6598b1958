use crate::core_auth::{User, UserDirectory};
use crate::core_ftpcommand::feat::features_response;
use crate::core_ftpcommand::ftpcommand::{Command, FtpCommand};
use crate::core_protocol::error::SessionError;
use crate::core_protocol::response::Response;
use log::{info, warn};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    AwaitUser,
    SentUserPrompt,
    AwaitPass,
    SentPassResult,
}

/// The USER/PASS exchange that precedes normal command dispatch.
///
/// [`LoginMachine::handle`] answers a command, [`LoginMachine::reply_sent`]
/// must be called once that answer is on the wire. It yields the user when
/// the login has completed.
#[derive(Debug)]
pub struct LoginMachine {
    state: LoginState,
    username: Option<String>,
    user: Option<Arc<User>>,
}

impl Default for LoginMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginMachine {
    pub fn new() -> Self {
        Self {
            state: LoginState::AwaitUser,
            username: None,
            user: None,
        }
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    pub fn handle(
        &mut self,
        command: &Command,
        users: &UserDirectory,
    ) -> Result<Response, SessionError> {
        match self.state {
            LoginState::AwaitUser => match command.kind() {
                FtpCommand::USER => {
                    self.username = Some(command.arg().to_string());
                    self.state = LoginState::SentUserPrompt;
                    Ok(Response::new(331, "Please specify the password."))
                }
                FtpCommand::FEAT if !command.has_arg() => Ok(features_response()),
                _ => Ok(Response::new(530, "Please login with USER and PASS.")),
            },
            LoginState::AwaitPass => match command.kind() {
                FtpCommand::PASS => {
                    let username = self
                        .username
                        .take()
                        .ok_or(SessionError::LoginState("PASS without a username"))?;
                    self.state = LoginState::SentPassResult;
                    match users.authenticate(&username, command.arg()) {
                        Some(user) => {
                            info!("User {} logged in", user.name());
                            self.user = Some(user);
                            Ok(Response::new(230, "Login successful."))
                        }
                        None => {
                            warn!("Failed login attempt for user {:?}", username);
                            Ok(Response::new(530, "Login incorrect."))
                        }
                    }
                }
                _ => {
                    self.username = None;
                    self.state = LoginState::AwaitUser;
                    Ok(Response::new(530, "Please login with USER and PASS."))
                }
            },
            LoginState::SentUserPrompt | LoginState::SentPassResult => Err(
                SessionError::LoginState("command received while a login reply is pending"),
            ),
        }
    }

    /// Advances past a sent reply. Returns the user once logged in.
    pub fn reply_sent(&mut self) -> Result<Option<Arc<User>>, SessionError> {
        match self.state {
            LoginState::AwaitUser => Ok(None),
            LoginState::SentUserPrompt => {
                self.state = LoginState::AwaitPass;
                Ok(None)
            }
            LoginState::AwaitPass => Err(SessionError::LoginState(
                "reply sent while waiting for PASS",
            )),
            LoginState::SentPassResult => {
                self.state = LoginState::AwaitUser;
                Ok(self.user.take())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_auth::helper::salted_digest;
    use crate::core_fs::SandboxedPath;
    use tempfile::TempDir;

    fn directory(dir: &TempDir) -> UserDirectory {
        let home = SandboxedPath::new(dir.path()).unwrap();
        UserDirectory::new(vec![User::new(
            "alice",
            "salt",
            salted_digest("secret", "salt"),
            home,
        )])
    }

    fn step(
        machine: &mut LoginMachine,
        users: &UserDirectory,
        line: &str,
    ) -> (u16, Option<Arc<User>>) {
        let response = machine.handle(&Command::parse(line), users).unwrap();
        let user = machine.reply_sent().unwrap();
        (response.code(), user)
    }

    #[test]
    fn test_retry_after_failures_then_success() {
        let dir = TempDir::new().unwrap();
        let users = directory(&dir);
        let mut machine = LoginMachine::new();

        assert_eq!(step(&mut machine, &users, "USER alice").0, 331);
        assert_eq!(machine.state(), LoginState::AwaitPass);
        assert_eq!(step(&mut machine, &users, "PASS wrong").0, 530);
        assert_eq!(machine.state(), LoginState::AwaitUser);
        assert_eq!(step(&mut machine, &users, "PASS wrong").0, 530);
        assert_eq!(machine.state(), LoginState::AwaitUser);
        assert_eq!(step(&mut machine, &users, "USER alice").0, 331);

        let (code, user) = step(&mut machine, &users, "PASS secret");
        assert_eq!(code, 230);
        assert_eq!(user.unwrap().name(), "alice");
    }

    #[test]
    fn test_pass_alone_stays_awaiting_user() {
        let dir = TempDir::new().unwrap();
        let users = directory(&dir);
        let mut machine = LoginMachine::new();

        let (code, user) = step(&mut machine, &users, "PASS secret");
        assert_eq!(code, 530);
        assert!(user.is_none());
        assert_eq!(machine.state(), LoginState::AwaitUser);
    }

    #[test]
    fn test_other_command_resets_after_user() {
        let dir = TempDir::new().unwrap();
        let users = directory(&dir);
        let mut machine = LoginMachine::new();

        step(&mut machine, &users, "USER alice");
        assert_eq!(step(&mut machine, &users, "PWD").0, 530);
        assert_eq!(machine.state(), LoginState::AwaitUser);
        assert_eq!(step(&mut machine, &users, "PASS secret").0, 530);
    }

    #[test]
    fn test_feat_allowed_before_login() {
        let dir = TempDir::new().unwrap();
        let users = directory(&dir);
        let mut machine = LoginMachine::new();

        assert_eq!(step(&mut machine, &users, "FEAT").0, 211);
        assert_eq!(machine.state(), LoginState::AwaitUser);
    }

    #[test]
    fn test_command_while_reply_pending_is_fatal() {
        let dir = TempDir::new().unwrap();
        let users = directory(&dir);
        let mut machine = LoginMachine::new();

        machine.handle(&Command::parse("USER alice"), &users).unwrap();
        assert!(matches!(
            machine.handle(&Command::parse("PASS secret"), &users),
            Err(SessionError::LoginState(_))
        ));
    }
}
