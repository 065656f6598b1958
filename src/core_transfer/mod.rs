//! Streaming transfers over an established data connection.
//!
//! Each transfer drives one direction of the data connection through the
//! [`DataTransfer`] contract; [`drive`] is the loop shared by all of them.

pub mod error;
pub mod file_reader;
pub mod file_writer;
pub mod listing;

pub use error::TransferError;
pub use file_reader::FileStreamReader;
pub use file_writer::FileStreamWriter;
pub use listing::DirectoryListingWriter;

use crate::core_protocol::response::Response;
use log::{debug, info};
use tokio::io::{AsyncRead, AsyncWrite};

/// Outcome of one `step_once` call: bytes moved, or the failure that stopped it.
pub type IoOutcome = Result<usize, TransferError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReport {
    /// Bytes moved over the data connection.
    pub bytes: u64,
}

#[allow(async_fn_in_trait)]
pub trait DataTransfer {
    /// Called once before the first step.
    fn begin(&mut self);

    /// False once a step has failed.
    fn healthy(&self) -> bool;

    /// Performs one bounded I/O operation, either on disk or on `data`.
    async fn step_once<S>(&mut self, data: &mut S) -> IoOutcome
    where
        S: AsyncRead + AsyncWrite + Unpin;

    fn is_complete(&self) -> bool;

    /// Releases resources and reports the result, given the last step outcome.
    async fn finish(&mut self, last: IoOutcome) -> Result<TransferReport, TransferError>;
}

/// The three transfer implementations, dispatched statically.
#[derive(Debug)]
pub enum Transfer {
    Retrieve(FileStreamWriter),
    Store(FileStreamReader),
    Listing(DirectoryListingWriter),
}

impl Transfer {
    pub fn describe(&self) -> &'static str {
        match self {
            Transfer::Retrieve(_) => "file download",
            Transfer::Store(_) => "file upload",
            Transfer::Listing(_) => "directory listing",
        }
    }

    /// Text of the `226` reply sent once the transfer succeeds.
    pub fn completion_message(&self) -> &'static str {
        match self {
            Transfer::Listing(_) => "Directory send OK.",
            _ => "Transfer complete.",
        }
    }
}

impl DataTransfer for Transfer {
    fn begin(&mut self) {
        match self {
            Transfer::Retrieve(t) => t.begin(),
            Transfer::Store(t) => t.begin(),
            Transfer::Listing(t) => t.begin(),
        }
    }

    fn healthy(&self) -> bool {
        match self {
            Transfer::Retrieve(t) => t.healthy(),
            Transfer::Store(t) => t.healthy(),
            Transfer::Listing(t) => t.healthy(),
        }
    }

    async fn step_once<S>(&mut self, data: &mut S) -> IoOutcome
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        match self {
            Transfer::Retrieve(t) => t.step_once(data).await,
            Transfer::Store(t) => t.step_once(data).await,
            Transfer::Listing(t) => t.step_once(data).await,
        }
    }

    fn is_complete(&self) -> bool {
        match self {
            Transfer::Retrieve(t) => t.is_complete(),
            Transfer::Store(t) => t.is_complete(),
            Transfer::Listing(t) => t.is_complete(),
        }
    }

    async fn finish(&mut self, last: IoOutcome) -> Result<TransferReport, TransferError> {
        match self {
            Transfer::Retrieve(t) => t.finish(last).await,
            Transfer::Store(t) => t.finish(last).await,
            Transfer::Listing(t) => t.finish(last).await,
        }
    }
}

/// A data-connection operation: the `150` reply that announces it plus the
/// transfer bound to it.
#[derive(Debug)]
pub struct DataResponse {
    pub response: Response,
    pub transfer: Transfer,
}

impl DataResponse {
    pub fn new(response: Response, transfer: Transfer) -> Self {
        Self { response, transfer }
    }
}

/// Runs `transfer` over `data` until it completes or a step fails.
pub async fn drive<T, S>(transfer: &mut T, data: &mut S) -> Result<TransferReport, TransferError>
where
    T: DataTransfer,
    S: AsyncRead + AsyncWrite + Unpin,
{
    transfer.begin();
    let mut last: IoOutcome = Ok(0);
    let mut steps: u64 = 0;
    while transfer.healthy() && !transfer.is_complete() {
        last = transfer.step_once(data).await;
        steps += 1;
    }
    debug!("Transfer stopped after {} steps", steps);

    let report = transfer.finish(last).await?;
    info!("Transfer complete: {} bytes", report.bytes);
    Ok(report)
}
