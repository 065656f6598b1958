use crate::buffer::Buffer;
use crate::constants::FILE_BUF_SZ;
use crate::core_fs::SandboxedPath;
use crate::core_transfer::{DataTransfer, IoOutcome, TransferError, TransferReport};
use log::debug;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Sends a file to the client (RETR).
///
/// A single read-ahead buffer is refilled from disk only once everything in
/// it has been written, and the refill happens on the following step.
#[derive(Debug)]
pub struct FileStreamWriter {
    file: File,
    size: u64,
    sent: u64,
    buffer: Buffer,
    offset: usize,
    failed: bool,
}

impl FileStreamWriter {
    pub async fn open(path: &SandboxedPath) -> std::io::Result<Self> {
        let file = File::open(path.as_path()).await?;
        let size = file.metadata().await?.len();
        let capacity = usize::try_from(size).unwrap_or(FILE_BUF_SZ).clamp(1, FILE_BUF_SZ);
        Ok(Self {
            file,
            size,
            sent: 0,
            buffer: Buffer::with_capacity(capacity),
            offset: 0,
            failed: false,
        })
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

impl DataTransfer for FileStreamWriter {
    fn begin(&mut self) {
        debug!("Sending {} bytes", self.size);
    }

    fn healthy(&self) -> bool {
        !self.failed
    }

    async fn step_once<S>(&mut self, data: &mut S) -> IoOutcome
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        if self.offset == self.buffer.len() {
            self.buffer.clear();
            self.offset = 0;
            let n = match self.file.read(self.buffer.spare_mut()).await {
                Ok(n) => n,
                Err(e) => {
                    self.failed = true;
                    return Err(TransferError::Local(e));
                }
            };
            if n == 0 {
                // The file shrank after it was opened.
                self.failed = true;
                return Err(TransferError::Local(std::io::Error::from(
                    std::io::ErrorKind::UnexpectedEof,
                )));
            }
            self.buffer.commit(n);
            return Ok(0);
        }

        match data.write(&self.buffer.as_slice()[self.offset..]).await {
            Ok(0) => {
                self.failed = true;
                Err(TransferError::Data(std::io::Error::from(
                    std::io::ErrorKind::WriteZero,
                )))
            }
            Ok(n) => {
                self.offset += n;
                self.sent += n as u64;
                Ok(n)
            }
            Err(e) => {
                self.failed = true;
                Err(TransferError::Data(e))
            }
        }
    }

    fn is_complete(&self) -> bool {
        self.sent >= self.size
    }

    async fn finish(&mut self, last: IoOutcome) -> Result<TransferReport, TransferError> {
        last?;
        Ok(TransferReport { bytes: self.sent })
    }
}
