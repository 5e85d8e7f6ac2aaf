//! Live client connections shared by every handler

use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_tungstenite::tungstenite::Message;

pub type ClientId = u64;

/// Frames a client may have queued before it counts as stalled
pub const CLIENT_QUEUE_CAPACITY: usize = 256;

/// Outbound half of a client connection; drained by the connection's writer task
pub type ClientSender = mpsc::Sender<Message>;

/// A registered client. Cheap to clone; clones share the same outbound channel.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: ClientId,
    name: Arc<str>,
    addr: SocketAddr,
    tx: ClientSender,
}

impl ClientHandle {
    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Queue a text frame for this client only. Fails if the client has gone
    /// away or its queue is full.
    pub fn send_text(&self, text: &str) -> Result<(), TrySendError<Message>> {
        self.send(Message::text(text.to_owned()))
    }

    pub fn send(&self, msg: Message) -> Result<(), TrySendError<Message>> {
        self.tx.try_send(msg)
    }
}

/// Set of connected clients keyed by id
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    clients: DashMap<ClientId, ClientHandle>,
    next_id: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client under a fresh id
    pub fn register(
        &self,
        name: impl Into<Arc<str>>,
        addr: SocketAddr,
        tx: ClientSender,
    ) -> ClientHandle {
        let handle = ClientHandle {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            addr,
            tx,
        };
        self.clients.insert(handle.id, handle.clone());
        tracing::info!("{} connects as {} (#{})", addr, handle.name, handle.id);
        handle
    }

    /// Remove a client. Returns false if it was already gone.
    pub fn unregister(&self, id: ClientId) -> bool {
        match self.clients.remove(&id) {
            Some((_, handle)) => {
                tracing::info!("{} disconnects ({})", handle.addr, handle.name);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.clients.contains_key(&id)
    }

    /// Copy of the current members, safe to iterate while others register or leave
    pub fn snapshot(&self) -> Vec<ClientHandle> {
        self.clients.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

pub type SharedRegistry = Arc<ConnectionRegistry>;

pub fn create_shared_registry() -> SharedRegistry {
    Arc::new(ConnectionRegistry::new())
}
