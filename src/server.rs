use crate::core_auth::UserDirectory;
use crate::core_network::network::{self, SessionRegistry};
use log::info;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// A bound FTP server, ready to accept sessions.
pub struct Server {
    listener: TcpListener,
    users: Arc<UserDirectory>,
    welcome_message: Arc<str>,
    registry: Arc<SessionRegistry>,
}

impl Server {
    pub async fn bind(
        addr: SocketAddr,
        users: UserDirectory,
        welcome_message: &str,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            users: Arc::new(users),
            welcome_message: Arc::from(welcome_message),
            registry: Arc::new(SessionRegistry::new()),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Live sessions of this server.
    pub fn registry(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Accepts sessions until the process ends.
    pub async fn run(self) {
        network::accept_loop(self.listener, self.users, self.welcome_message, self.registry).await
    }

    /// Accepts sessions until `shutdown` resolves. Sessions already running
    /// are left to finish on their own.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let Server {
            listener,
            users,
            welcome_message,
            registry,
        } = self;
        let accepting =
            network::accept_loop(listener, users, welcome_message, Arc::clone(&registry));
        tokio::select! {
            _ = accepting => {}
            _ = shutdown => {
                let open = registry.len().await;
                info!("Shutdown requested, {} session(s) left to finish", open);
            }
        }
    }
}
