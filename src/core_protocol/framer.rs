use crate::buffer::Buffer;
use crate::constants::CMD_BUF_SZ;
use log::warn;
use tokio::io::{AsyncRead, AsyncReadExt};

#[derive(Debug, PartialEq, Eq)]
pub enum Frame {
    /// A complete command line, CRLF stripped.
    Line(String),
    /// The input buffer filled up without a terminator and was discarded.
    Overflow,
}

/// Splits the control stream into CRLF-terminated lines.
///
/// Only bytes that arrived since the last scan are examined, plus the byte
/// before them so that a CRLF split across two reads is still found.
#[derive(Debug)]
pub struct LineFramer {
    input: Buffer,
    scanned: usize,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::with_capacity(CMD_BUF_SZ)
    }
}

impl LineFramer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            input: Buffer::with_capacity(capacity),
            scanned: 0,
        }
    }

    /// Number of bytes buffered but not yet returned as a line.
    pub fn pending(&self) -> usize {
        self.input.len()
    }

    /// Adds received bytes. Returns how many fit.
    pub fn push(&mut self, bytes: &[u8]) -> usize {
        self.input.append(bytes)
    }

    /// Extracts the next complete frame from what is already buffered.
    pub fn next_frame(&mut self) -> Option<Frame> {
        let data = self.input.as_slice();
        let start = self.scanned.max(1);
        let found = (start..data.len()).find(|&i| data[i] == b'\n' && data[i - 1] == b'\r');

        if let Some(lf) = found {
            let line = String::from_utf8_lossy(&data[..lf - 1]).into_owned();
            self.input.consume(lf + 1);
            self.scanned = 0;
            return Some(Frame::Line(line));
        }

        self.scanned = data.len();
        if self.input.is_full() {
            warn!(
                "Discarding {} bytes of command input without a line terminator",
                self.input.len()
            );
            self.input.clear();
            self.scanned = 0;
            return Some(Frame::Overflow);
        }
        None
    }

    /// Returns the next frame, reading from `reader` only when nothing complete
    /// is buffered. `Ok(None)` means the peer closed the connection.
    pub async fn read_frame<R>(&mut self, reader: &mut R) -> std::io::Result<Option<Frame>>
    where
        R: AsyncRead + Unpin,
    {
        loop {
            if let Some(frame) = self.next_frame() {
                return Ok(Some(frame));
            }
            let n = reader.read(self.input.spare_mut()).await?;
            if n == 0 {
                return Ok(None);
            }
            self.input.commit(n);
        }
    }
}
