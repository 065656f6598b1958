use crate::buffer::Buffer;
use crate::constants::CMD_BUF_SZ;
use crate::core_fs::SandboxedPath;
use crate::core_transfer::{DataTransfer, IoOutcome, TransferError, TransferReport};
use chrono::{DateTime, Utc};
use log::debug;
use std::fs::Metadata;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

/// Streams an MLSD listing of one directory.
///
/// Entries are computed up front, one per regular file or directory; anything
/// else (symlinks, sockets, devices) is left out.
#[derive(Debug)]
pub struct DirectoryListingWriter {
    entries: Vec<Vec<u8>>,
    next: usize,
    entry_offset: usize,
    buffer: Buffer,
    offset: usize,
    sent: u64,
    failed: bool,
}

/// Formats one MLSD line, or `None` for entries that are not listed.
pub fn mlsd_entry(name: &str, metadata: &Metadata) -> Option<String> {
    let file_type = metadata.file_type();
    let facts = if file_type.is_file() {
        let mut facts = format!("type=file;size={};", metadata.len());
        if let Ok(modified) = metadata.modified() {
            let modified: DateTime<Utc> = modified.into();
            facts.push_str(&format!("modify={};", modified.format("%Y%m%d%H%M%S")));
        }
        facts
    } else if file_type.is_dir() {
        String::from("type=dir;")
    } else {
        return None;
    };
    Some(format!("{} {}\r\n", facts, name))
}

impl DirectoryListingWriter {
    pub async fn new(dir: &SandboxedPath) -> std::io::Result<Self> {
        let mut listed = Vec::new();
        let mut read_dir = tokio::fs::read_dir(dir.as_path()).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let metadata = match tokio::fs::symlink_metadata(entry.path()).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!("Skipping {:?}: {}", entry.path(), e);
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(line) = mlsd_entry(&name, &metadata) {
                listed.push((name, line));
            }
        }
        listed.sort();

        Ok(Self {
            entries: listed.into_iter().map(|(_, line)| line.into_bytes()).collect(),
            next: 0,
            entry_offset: 0,
            buffer: Buffer::with_capacity(CMD_BUF_SZ),
            offset: 0,
            sent: 0,
            failed: false,
        })
    }

    /// Packs as many unsent entry bytes as fit into the empty buffer.
    fn refill(&mut self) {
        self.buffer.clear();
        self.offset = 0;
        while self.next < self.entries.len() {
            let entry = &self.entries[self.next][self.entry_offset..];
            let taken = self.buffer.append(entry);
            if taken == entry.len() {
                self.next += 1;
                self.entry_offset = 0;
            } else {
                self.entry_offset += taken;
                break;
            }
        }
    }
}

impl DataTransfer for DirectoryListingWriter {
    fn begin(&mut self) {
        debug!("Sending {} listing entries", self.entries.len());
    }

    fn healthy(&self) -> bool {
        !self.failed
    }

    async fn step_once<S>(&mut self, data: &mut S) -> IoOutcome
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        if self.offset == self.buffer.len() {
            self.refill();
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
        self.next == self.entries.len() && self.offset == self.buffer.len()
    }

    async fn finish(&mut self, last: IoOutcome) -> Result<TransferReport, TransferError> {
        last?;
        Ok(TransferReport { bytes: self.sent })
    }
}
