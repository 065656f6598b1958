// src/constants.rs

use std::time::Duration;

pub const USERNAME_REGEX: &str = r"^[A-Za-z0-9_.-]{1,32}$";

/// Line terminator for every control-channel reply and listing entry.
pub const EOL: &[u8] = b"\r\n";

/// Capacity of the control input/output buffers and the listing output buffer.
pub const CMD_BUF_SZ: usize = 2048;
/// Capacity of the disk-side buffers used by file transfers.
pub const FILE_BUF_SZ: usize = 64 * 1024;

/// Pause after a failed accept before trying again.
pub const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

pub const FEATURES: [&str; 2] = ["PASV", "MLSD"];

pub const DEFAULT_CONFIG_PATH: &str = "pasvftpd.toml";
pub const DEFAULT_LISTEN_PORT: u16 = 21;
pub const DEFAULT_THREAD_COUNT: usize = 2;
pub const DEFAULT_WELCOME_MESSAGE: &str = "Welcome to pasvftpd.";
pub const DEFAULT_USER: &str = "anonymous";
pub const DEFAULT_HOME_DIR: &str = "public_ftp";
pub const SALT_LENGTH: usize = 16;
