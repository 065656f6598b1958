pub mod dtp;
pub mod network;
pub mod pasv;

pub use dtp::{Dtp, DtpError};
pub use network::SessionRegistry;
