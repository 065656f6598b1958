use crate::core_transfer::{drive, Transfer, TransferError, TransferReport};
use log::{debug, info, warn};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

#[derive(Error, Debug)]
pub enum DtpError {
    #[error("Passive mode requires an IPv4 control connection, got {0}")]
    NotIpv4(IpAddr),

    #[error("Failed to open passive listener: {0}")]
    Listen(std::io::Error),

    #[error("No passive listener is open")]
    NoListener,

    #[error("Failed to accept data connection: {0}")]
    Accept(std::io::Error),
}

impl DtpError {
    pub fn to_ftp_response(&self) -> (u16, &'static str) {
        match self {
            DtpError::NotIpv4(_) => (522, "Network protocol not supported."),
            DtpError::Listen(_) | DtpError::Accept(_) => (425, "Can't open data connection."),
            DtpError::NoListener => (503, "Bad sequence of commands."),
        }
    }
}

/// Data Transfer Process: owns the passive listener and the data connection
/// of one session.
#[derive(Debug)]
pub struct Dtp {
    local_ip: IpAddr,
    peer_ip: IpAddr,
    listener: Option<TcpListener>,
    data: Option<TcpStream>,
}

/// IPv4-mapped IPv6 addresses compare equal to their IPv4 form.
fn canonical_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        },
        v4 => v4,
    }
}

impl Dtp {
    /// `local` and `peer` are the two ends of the control connection.
    pub fn new(local: SocketAddr, peer: SocketAddr) -> Self {
        Self {
            local_ip: canonical_ip(local.ip()),
            peer_ip: canonical_ip(peer.ip()),
            listener: None,
            data: None,
        }
    }

    pub fn has_connection(&self) -> bool {
        self.data.is_some()
    }

    /// Opens a listener on an ephemeral port of the control connection's
    /// local address and returns the address to announce in the `227` reply.
    /// Any previous data connection is closed first.
    pub async fn passive_begin(&mut self) -> Result<SocketAddrV4, DtpError> {
        self.close().await;
        self.listener = None;

        let ip: Ipv4Addr = match self.local_ip {
            IpAddr::V4(v4) => v4,
            other => return Err(DtpError::NotIpv4(other)),
        };
        let listener = TcpListener::bind((ip, 0)).await.map_err(DtpError::Listen)?;
        let port = listener.local_addr().map_err(DtpError::Listen)?.port();
        debug!("Passive listener open on {}:{}", ip, port);

        self.listener = Some(listener);
        Ok(SocketAddrV4::new(ip, port))
    }

    /// Waits for the client's data connection. Connections from any address
    /// other than the control peer are dropped and waiting continues.
    pub async fn accept_passive(&mut self) -> Result<(), DtpError> {
        let listener = self.listener.as_ref().ok_or(DtpError::NoListener)?;
        loop {
            let (stream, addr) = listener.accept().await.map_err(DtpError::Accept)?;
            if canonical_ip(addr.ip()) != self.peer_ip {
                warn!(
                    "Rejected data connection from {} (control peer is {})",
                    addr, self.peer_ip
                );
                continue;
            }
            info!("Passive data connection established from {}", addr);
            self.data = Some(stream);
            break;
        }
        self.listener = None;
        Ok(())
    }

    /// Runs `transfer` over the data connection, which is closed afterwards
    /// whatever the outcome.
    pub async fn run(&mut self, mut transfer: Transfer) -> Result<TransferReport, TransferError> {
        let mut stream = self.data.take().ok_or(TransferError::NoConnection)?;
        info!("Starting {}", transfer.describe());
        let result = drive(&mut transfer, &mut stream).await;
        if let Err(e) = stream.shutdown().await {
            debug!("Data connection shutdown: {}", e);
        }
        result
    }

    pub async fn close(&mut self) {
        if let Some(mut stream) = self.data.take() {
            debug!("Closing data connection");
            let _ = stream.shutdown().await;
        }
    }
}
