use crate::buffer::Buffer;
use crate::constants::FILE_BUF_SZ;
use crate::core_transfer::{DataTransfer, IoOutcome, TransferError, TransferReport};
use crate::helpers::is_peer_closed;
use log::debug;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Receives a file from the client (STOR).
///
/// The upload ends when the peer closes the data connection. Received bytes
/// are flushed to disk whenever the buffer fills and once more on finish.
#[derive(Debug)]
pub struct FileStreamReader {
    file: File,
    buffer: Buffer,
    received: u64,
    done: bool,
    failed: bool,
}

impl FileStreamReader {
    /// Takes a file already created inside the sandbox.
    pub fn new(file: std::fs::File) -> Self {
        Self {
            file: File::from_std(file),
            buffer: Buffer::with_capacity(FILE_BUF_SZ),
            received: 0,
            done: false,
            failed: false,
        }
    }

    async fn flush_buffer(&mut self) -> Result<(), TransferError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.file
            .write_all(self.buffer.as_slice())
            .await
            .map_err(TransferError::Local)?;
        self.buffer.clear();
        Ok(())
    }
}

impl DataTransfer for FileStreamReader {
    fn begin(&mut self) {
        debug!("Receiving upload");
    }

    fn healthy(&self) -> bool {
        !self.failed
    }

    async fn step_once<S>(&mut self, data: &mut S) -> IoOutcome
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        if self.buffer.is_full() {
            let len = self.buffer.len();
            return match self.flush_buffer().await {
                Ok(()) => Ok(len),
                Err(e) => {
                    self.failed = true;
                    Err(e)
                }
            };
        }

        match data.read(self.buffer.spare_mut()).await {
            Ok(0) => {
                self.done = true;
                Ok(0)
            }
            Ok(n) => {
                self.buffer.commit(n);
                self.received += n as u64;
                Ok(n)
            }
            Err(e) if is_peer_closed(&e) => {
                self.done = true;
                Ok(0)
            }
            Err(e) => {
                self.failed = true;
                Err(TransferError::Data(e))
            }
        }
    }

    fn is_complete(&self) -> bool {
        self.done
    }

    async fn finish(&mut self, last: IoOutcome) -> Result<TransferReport, TransferError> {
        last?;
        self.flush_buffer().await?;
        self.file.flush().await.map_err(TransferError::Local)?;
        Ok(TransferReport {
            bytes: self.received,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_transfer::drive;
    use std::io::ErrorKind;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tempfile::TempDir;
    use tokio::io::ReadBuf;

    /// Yields `chunks` one read at a time, then fails every read with `error`.
    struct FailingStream {
        chunks: Vec<Vec<u8>>,
        error: ErrorKind,
    }

    impl AsyncRead for FailingStream {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            if self.chunks.is_empty() {
                return Poll::Ready(Err(std::io::Error::from(self.error)));
            }
            let chunk = self.chunks.remove(0);
            buf.put_slice(&chunk);
            Poll::Ready(Ok(()))
        }
    }

    impl AsyncWrite for FailingStream {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_reset_mid_upload_keeps_received_bytes() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("upload.bin");
        let mut reader = FileStreamReader::new(std::fs::File::create(&target).unwrap());
        let mut stream = FailingStream {
            chunks: vec![b"first part, ".to_vec(), b"second part".to_vec()],
            error: ErrorKind::ConnectionReset,
        };

        let report = drive(&mut reader, &mut stream).await.unwrap();
        assert_eq!(report.bytes, 23);
        assert_eq!(std::fs::read(&target).unwrap(), b"first part, second part");
    }

    #[tokio::test]
    async fn test_other_data_errors_fail_the_upload() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("upload.bin");
        let mut reader = FileStreamReader::new(std::fs::File::create(&target).unwrap());
        let mut stream = FailingStream {
            chunks: vec![b"partial".to_vec()],
            error: ErrorKind::TimedOut,
        };

        let err = drive(&mut reader, &mut stream).await.unwrap_err();
        assert!(matches!(err, TransferError::Data(_)));
        assert_eq!(err.to_ftp_response().0, 426);
    }

    #[tokio::test]
    async fn test_unwritable_file_is_a_local_error() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("readonly.bin");
        std::fs::write(&target, b"").unwrap();
        let mut reader = FileStreamReader::new(std::fs::File::open(&target).unwrap());
        let mut stream = FailingStream {
            chunks: vec![b"data".to_vec()],
            error: ErrorKind::ConnectionReset,
        };

        let err = drive(&mut reader, &mut stream).await.unwrap_err();
        assert!(matches!(err, TransferError::Local(_)));
        assert_eq!(err.to_ftp_response().0, 451);
    }

    #[tokio::test]
    async fn test_upload_until_peer_closes() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("upload.bin");
        let file = std::fs::File::create(&target).unwrap();
        let mut reader = FileStreamReader::new(file);

        let contents: Vec<u8> = (0..FILE_BUF_SZ + 1000).map(|i| (i % 7) as u8).collect();
        let expected = contents.clone();
        let (mut client, mut server) = tokio::io::duplex(4096);
        let sender = tokio::spawn(async move {
            client.write_all(&contents).await.unwrap();
        });

        let report = drive(&mut reader, &mut server).await.unwrap();
        sender.await.unwrap();
        assert_eq!(report.bytes, expected.len() as u64);
        assert_eq!(std::fs::read(&target).unwrap(), expected);
    }
}
