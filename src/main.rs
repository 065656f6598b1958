use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use pasvftpd::constants::DEFAULT_CONFIG_PATH;
use pasvftpd::core_cli::Cli;
use pasvftpd::core_log::logger::init_logger;
use pasvftpd::{Config, Server};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logger(args.verbose);

    let config_path = args
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = Config::load_or_create(&config_path)
        .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;
    if let Some(port) = args.port {
        config.server.listen_port = port;
    }

    let base_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let users = config
        .user_directory(base_dir)
        .context("Failed to prepare user home directories")?;
    info!("Loaded {} user(s)", users.len());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.thread_count)
        .enable_all()
        .build()
        .context("Failed to build the async runtime")?;

    runtime.block_on(async {
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.server.listen_port));
        let server = Server::bind(addr, users, &config.server.welcome_message)
            .await
            .with_context(|| format!("Failed to listen on {}", addr))?;
        server
            .run_until(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to wait for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            })
            .await;
        info!("Server stopped");
        Ok::<(), anyhow::Error>(())
    })
}
