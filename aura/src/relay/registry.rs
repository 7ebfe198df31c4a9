use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::models::Role;
use crate::relay::events::{Hello, ServerEvent};

/// Metadata for one connected peer, owned by the registry for the
/// lifetime of the connection. Nothing here is persisted.
#[derive(Debug)]
pub struct PeerSession {
    pub role: Option<Role>,
    pub device_id: Option<String>,
    pub user_id: Option<String>,
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<ServerEvent>,
}

/// The set of currently connected peers. Register/unregister serialize on
/// the map lock; fan-out iterates under a read lock and tolerates peers
/// disappearing concurrently.
pub struct SessionRegistry {
    peers: RwLock<HashMap<Uuid, PeerSession>>,
    channel_capacity: usize,
}

impl SessionRegistry {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            peers: RwLock::new(HashMap::new()),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Add a peer with no declared role yet. Returns the connection id and
    /// the receiving end of its outbound queue.
    pub async fn register(&self) -> (Uuid, mpsc::Receiver<ServerEvent>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(self.channel_capacity);

        let session = PeerSession {
            role: None,
            device_id: None,
            user_id: None,
            connected_at: Utc::now(),
            sender: tx,
        };

        self.peers.write().await.insert(id, session);
        (id, rx)
    }

    /// Remove a peer. Safe to call repeatedly or for an unknown id.
    pub async fn unregister(&self, id: Uuid) {
        self.peers.write().await.remove(&id);
    }

    /// Record a peer's handshake. Unknown ids are ignored (the peer may
    /// have already disconnected).
    pub async fn declare(&self, id: Uuid, hello: Hello) {
        if let Some(session) = self.peers.write().await.get_mut(&id) {
            session.role = Some(hello.role);
            session.device_id = hello.device_id;
            session.user_id = hello.user_id;
        }
    }

    pub async fn role_of(&self, id: Uuid) -> Option<Role> {
        self.peers.read().await.get(&id).and_then(|s| s.role)
    }

    pub async fn connected_peers(&self) -> usize {
        self.peers.read().await.len()
    }

    /// Deliver `event` to every peer except the sender. Best-effort: a
    /// peer whose queue is full or closed is skipped without error, and
    /// the send never blocks. Returns how many peers accepted the event.
    pub async fn broadcast_from(&self, sender_id: Uuid, event: ServerEvent) -> usize {
        let peers = self.peers.read().await;
        let mut delivered = 0;

        for (id, session) in peers.iter() {
            if *id == sender_id {
                continue;
            }
            match session.sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::debug!(peer = %id, "Peer queue full, dropping event");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::debug!(peer = %id, "Peer gone, skipping");
                }
            }
        }

        delivered
    }
}
