use crate::buffer::Buffer;
use crate::constants::{CMD_BUF_SZ, EOL};
use crate::core_protocol::error::{ResponseError, SessionError};
use log::debug;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// A reply code is usable when it lies in 100..=699 and its tens digit is at most 5.
pub fn is_valid_code(code: u16) -> bool {
    (100..=699).contains(&code) && (code / 10) % 10 <= 5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
    Composing,
    Finalized,
    Sent,
}

/// One control-channel reply.
///
/// The message is built up while `Composing`, turned into wire bytes exactly
/// once by [`Response::finalize`], then marked `Sent` by the [`ReplySink`].
#[derive(Debug, Clone)]
pub struct Response {
    code: u16,
    message: String,
    preformatted: bool,
    state: ResponseState,
}

impl Response {
    pub fn new(code: u16, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            preformatted: false,
            state: ResponseState::Composing,
        }
    }

    /// A reply whose text already carries its own code prefixes, such as a
    /// multi-line `211` feature list.
    pub fn preformatted(code: u16, text: &str) -> Self {
        Self {
            code,
            message: text.to_string(),
            preformatted: true,
            state: ResponseState::Composing,
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn state(&self) -> ResponseState {
        self.state
    }

    pub fn append(&mut self, text: &str) {
        self.message.push_str(text);
    }

    /// Writes `<code> <message>` followed by exactly one CRLF.
    ///
    /// Bytes go into `out` while it has room and into `overflow` after that.
    /// The terminator lands wholly in `out`, split one byte each, or wholly in
    /// `overflow`, and is skipped if the text already ends with CRLF.
    pub fn finalize(
        &mut self,
        out: &mut Buffer,
        overflow: &mut Vec<u8>,
    ) -> Result<(), ResponseError> {
        if self.state != ResponseState::Composing {
            return Err(ResponseError::AlreadyFinalized);
        }
        if !is_valid_code(self.code) {
            return Err(ResponseError::InvalidCode(self.code));
        }

        let text = if self.preformatted {
            self.message.clone()
        } else {
            format!("{} {}", self.code, self.message)
        };
        push_bytes(out, overflow, text.as_bytes());

        if !ends_with_eol(out, overflow) {
            if !overflow.is_empty() {
                overflow.extend_from_slice(EOL);
            } else {
                let taken = out.append(EOL);
                overflow.extend_from_slice(&EOL[taken..]);
            }
        }

        self.state = ResponseState::Finalized;
        Ok(())
    }

    fn mark_sent(&mut self) -> Result<(), ResponseError> {
        if self.state != ResponseState::Finalized {
            return Err(ResponseError::NotFinalized);
        }
        self.state = ResponseState::Sent;
        Ok(())
    }
}

fn push_bytes(out: &mut Buffer, overflow: &mut Vec<u8>, bytes: &[u8]) {
    if !overflow.is_empty() {
        overflow.extend_from_slice(bytes);
        return;
    }
    let taken = out.append(bytes);
    overflow.extend_from_slice(&bytes[taken..]);
}

fn ends_with_eol(out: &Buffer, overflow: &[u8]) -> bool {
    let mut tail = out.as_slice().iter().chain(overflow.iter()).rev();
    tail.next() == Some(&b'\n') && tail.next() == Some(&b'\r')
}

/// Output side of the control connection: a bounded buffer plus the overflow
/// of the reply currently being written.
#[derive(Debug)]
pub struct ReplySink {
    out: Buffer,
    overflow: Vec<u8>,
}

impl Default for ReplySink {
    fn default() -> Self {
        Self::with_capacity(CMD_BUF_SZ)
    }
}

impl ReplySink {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Buffer::with_capacity(capacity),
            overflow: Vec::new(),
        }
    }

    /// Finalizes `response` and writes it with as many partial writes as it takes.
    pub async fn send<W>(
        &mut self,
        writer: &mut W,
        response: &mut Response,
    ) -> Result<(), SessionError>
    where
        W: AsyncWrite + Unpin,
    {
        response.finalize(&mut self.out, &mut self.overflow)?;
        debug!("Reply: {} {}", response.code(), first_line(response.message()));

        while !self.out.is_empty() {
            let n = writer.write(self.out.as_slice()).await?;
            if n == 0 {
                return Err(SessionError::Io(std::io::Error::from(
                    std::io::ErrorKind::WriteZero,
                )));
            }
            self.out.consume(n);
            if self.out.is_empty() && !self.overflow.is_empty() {
                let taken = self.out.append(&self.overflow);
                self.overflow.drain(..taken);
            }
        }
        writer.flush().await?;

        response.mark_sent()?;
        Ok(())
    }
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}
