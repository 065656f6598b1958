use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("No data connection established")]
    NoConnection,

    #[error("Data connection failed: {0}")]
    Data(std::io::Error),

    #[error("Local file error: {0}")]
    Local(std::io::Error),
}

impl TransferError {
    pub fn to_ftp_response(&self) -> (u16, &'static str) {
        match self {
            TransferError::NoConnection => (425, "Use PORT or PASV first."),
            TransferError::Data(_) => (426, "Connection closed; transfer aborted."),
            TransferError::Local(_) => {
                (451, "Requested action aborted. Local error in processing.")
            }
        }
    }
}
