use thiserror::Error;

/// Failures of sandboxed path operations.
///
/// Messages carry the client-supplied name only, never the resolved host path.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("empty path")]
    Empty,

    #[error("not a single path component: {0}")]
    InvalidName(String),

    #[error("no such file or directory: {0}")]
    NotFound(String),

    #[error("path leaves the home directory: {0}")]
    OutsideRoot(String),

    #[error("file already exists: {0}")]
    AlreadyExists(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PathError {
    pub fn to_ftp_response(&self) -> (u16, &'static str) {
        match self {
            PathError::Empty | PathError::InvalidName(_) => {
                (553, "Requested action not taken. File name not allowed.")
            }
            PathError::AlreadyExists(_) => (550, "File already exists."),
            PathError::PermissionDenied(_) => (550, "Permission denied."),
            PathError::Io(_) => (451, "Requested action aborted. Local error in processing."),
            PathError::NotFound(_) | PathError::OutsideRoot(_) => (550, "Failed to open file."),
        }
    }
}
