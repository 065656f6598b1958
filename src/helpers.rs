use std::io::{Error, ErrorKind};
use std::net::SocketAddrV4;

/// Wraps a pathname in double quotes for a `257` reply, doubling embedded quotes.
pub fn quote_pathname(path: &str) -> String {
    format!("\"{}\"", path.replace('"', "\"\""))
}

/// Formats `h1,h2,h3,h4,p1,p2` for a `227` reply.
pub fn format_pasv_address(addr: SocketAddrV4) -> String {
    let [h1, h2, h3, h4] = addr.ip().octets();
    let port = addr.port();
    format!("{},{},{},{},{},{}", h1, h2, h3, h4, port / 256, port % 256)
}

/// Whether a data-connection error just means the peer went away.
pub fn is_peer_closed(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::UnexpectedEof
    )
}
