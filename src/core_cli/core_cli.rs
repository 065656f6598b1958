use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "pasvftpd", about = "A passive-mode FTP server written in Rust.")]
pub struct Cli {
    /// Path to the configuration file, created with defaults if missing
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listen port, overriding the configuration file
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["pasvftpd", "-c", "/tmp/ftp.toml", "--port", "2121", "-v"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/ftp.toml")));
        assert_eq!(cli.port, Some(2121));
        assert!(cli.verbose);

        let cli = Cli::parse_from(["pasvftpd"]);
        assert!(cli.config.is_none());
        assert!(cli.port.is_none());
        assert!(!cli.verbose);
    }
}
