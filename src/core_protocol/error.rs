use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResponseError {
    #[error("invalid reply code {0}")]
    InvalidCode(u16),

    #[error("response finalized twice")]
    AlreadyFinalized,

    #[error("response sent before being finalized")]
    NotFinalized,
}

/// Failures that end one session. The server and other sessions keep running.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("control connection I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error("invalid login state: {0}")]
    LoginState(&'static str),

    #[error("command dispatched without an authenticated user")]
    NotAuthenticated,

    #[error("working directory outside of the home directory")]
    OutsideHome,
}
