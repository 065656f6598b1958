use crate::core_auth::{User, UserDirectory};
use crate::core_fs::SandboxedPath;
use crate::core_ftpcommand::handlers::{dispatch, Action};
use crate::core_network::dtp::Dtp;
use crate::core_protocol::{ProtocolInterpreter, Response, SessionError};
use crate::core_transfer::DataResponse;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationType {
    Ascii,
    Image,
}

/// Per-connection state: the logged-in user, where they are, and the data side.
#[derive(Debug)]
pub struct Session {
    user: Option<Arc<User>>,
    cwd: Option<SandboxedPath>,
    pub repr_type: RepresentationType,
    pub dtp: Dtp,
}

impl Session {
    pub fn new(dtp: Dtp) -> Self {
        Self {
            user: None,
            cwd: None,
            repr_type: RepresentationType::Ascii,
            dtp,
        }
    }

    /// Binds `user` and moves to their home directory.
    pub fn login(&mut self, user: Arc<User>) {
        self.cwd = Some(user.home().clone());
        self.user = Some(user);
    }

    pub fn user(&self) -> Result<&Arc<User>, SessionError> {
        self.user.as_ref().ok_or(SessionError::NotAuthenticated)
    }

    pub fn home(&self) -> Result<&SandboxedPath, SessionError> {
        Ok(self.user()?.home())
    }

    pub fn cwd(&self) -> Result<&SandboxedPath, SessionError> {
        self.cwd.as_ref().ok_or(SessionError::NotAuthenticated)
    }

    /// Directory a client path starts from: the home for a leading `/`,
    /// the current directory otherwise.
    pub fn base_for(&self, input: &str) -> Result<&SandboxedPath, SessionError> {
        if input.starts_with('/') {
            self.home()
        } else {
            self.cwd()
        }
    }

    /// Changes directory. `path` must be the home or inside it.
    pub fn set_cwd(&mut self, path: SandboxedPath) -> Result<(), SessionError> {
        let home = self.home()?;
        if path != *home && !path.is_descendant_of(home) {
            return Err(SessionError::OutsideHome);
        }
        self.cwd = Some(path);
        Ok(())
    }
}

/// Serves one control connection from the welcome banner to QUIT or disconnect.
pub async fn serve<S>(
    control: S,
    local: SocketAddr,
    peer: SocketAddr,
    users: Arc<UserDirectory>,
    welcome_message: &str,
) -> Result<(), SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut pi = ProtocolInterpreter::new(control);
    pi.reply(220, welcome_message).await?;

    let user = match pi.login(&users).await? {
        Some(user) => user,
        None => return Ok(()),
    };
    info!("Session for {} started from {}", user.name(), peer);

    let mut session = Session::new(Dtp::new(local, peer));
    session.login(user);

    while let Some(command) = pi.next_command().await? {
        match dispatch(&mut session, &command).await? {
            Action::Reply(mut response) => pi.send(&mut response).await?,
            Action::Passive(mut response) => {
                pi.send(&mut response).await?;
                if let Err(e) = session.dtp.accept_passive().await {
                    error!("Passive mode failed: {}", e);
                    let (code, message) = e.to_ftp_response();
                    pi.reply(code, message).await?;
                }
            }
            Action::Transfer(DataResponse {
                mut response,
                transfer,
            }) => {
                pi.send(&mut response).await?;
                let completion = transfer.completion_message();
                let mut done = match session.dtp.run(transfer).await {
                    Ok(_) => Response::new(226, completion),
                    Err(e) => {
                        error!("Transfer failed: {}", e);
                        let (code, message) = e.to_ftp_response();
                        Response::new(code, message)
                    }
                };
                pi.send(&mut done).await?;
            }
            Action::Close(mut response) => {
                pi.send(&mut response).await?;
                break;
            }
        }
    }

    session.dtp.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::core_ftpcommand::handlers::test_support::logged_in;
    use crate::core_protocol::SessionError;
    use tempfile::TempDir;

    #[test]
    fn test_base_for_and_set_cwd() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let mut session = logged_in(&dir);
        let home = session.home().unwrap().clone();
        let sub = home.resolve("sub").unwrap();

        session.set_cwd(sub.clone()).unwrap();
        assert_eq!(session.base_for("/x").unwrap(), &home);
        assert_eq!(session.base_for("x").unwrap(), &sub);

        let outside = crate::core_fs::SandboxedPath::new(dir.path().parent().unwrap()).unwrap();
        assert!(matches!(session.set_cwd(outside), Err(SessionError::OutsideHome)));
        assert_eq!(session.cwd().unwrap(), &sub);
    }
}
