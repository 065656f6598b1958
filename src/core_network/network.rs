use crate::constants::ACCEPT_RETRY_DELAY;
use crate::core_auth::UserDirectory;
use crate::session;
use log::{error, info};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

/// Membership of live sessions, keyed by an id handed out on accept.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<u64, SocketAddr>>,
    next_id: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, peer: SocketAddr) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.sessions.lock().await.insert(id, peer);
        id
    }

    pub async fn unregister(&self, id: u64) {
        self.sessions.lock().await.remove(&id);
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Accepts control connections forever, one task per session. Accept errors
/// are logged and accepting continues after a short pause.
pub async fn accept_loop(
    listener: TcpListener,
    users: Arc<UserDirectory>,
    welcome_message: Arc<str>,
    registry: Arc<SessionRegistry>,
) {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                continue;
            }
        };
        info!(
            "New connection from {} ({} already active)",
            peer,
            registry.len().await
        );

        let users = Arc::clone(&users);
        let welcome_message = Arc::clone(&welcome_message);
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            handle_connection(socket, peer, users, welcome_message, registry).await;
        });
    }
}

async fn handle_connection(
    socket: TcpStream,
    peer: SocketAddr,
    users: Arc<UserDirectory>,
    welcome_message: Arc<str>,
    registry: Arc<SessionRegistry>,
) {
    let local = match socket.local_addr() {
        Ok(local) => local,
        Err(e) => {
            error!("Connection from {} has no local address: {}", peer, e);
            return;
        }
    };

    let id = registry.register(peer).await;
    match session::serve(socket, local, peer, users, &welcome_message).await {
        Ok(()) => info!("Connection closed for {}", peer),
        Err(e) => error!("Session with {} ended: {}", peer, e),
    }
    registry.unregister(id).await;
}
