use crate::registry::SharedRegistry;
use tokio::sync::mpsc::error::TrySendError;

/// Fans a text payload out to every registered client
#[derive(Clone)]
pub struct Broadcaster {
    registry: SharedRegistry,
}

impl Broadcaster {
    pub fn new(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    /// Send `payload` to every client in a registry snapshot.
    ///
    /// A failed send (client gone, or its queue full because it stopped
    /// reading) drops that client from the registry and delivery to the rest
    /// continues. Returns how many clients the payload was queued for.
    pub fn broadcast(&self, payload: &str) -> usize {
        let clients = self.registry.snapshot();
        let mut delivered = 0;

        for client in &clients {
            match client.send_text(payload) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    let reason = match e {
                        TrySendError::Full(_) => "not reading",
                        TrySendError::Closed(_) => "gone",
                    };
                    tracing::warn!(
                        "Failed to send to client {} ({}, {}), dropping it",
                        client.addr(),
                        client.name(),
                        reason
                    );
                    self.registry.unregister(client.id());
                }
            }
        }

        tracing::debug!("Broadcast delivered to {}/{} client(s)", delivered, clients.len());
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::create_shared_registry;
    use std::net::SocketAddr;
    use tokio::sync::mpsc;
    use tokio_tungstenite::tungstenite::Message;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn test_broadcast_reaches_everyone() {
        let registry = create_shared_registry();
        let (tx_a, mut rx_a) = mpsc::channel(8);
        let (tx_b, mut rx_b) = mpsc::channel(8);
        registry.register("Alice Chen", addr(1000), tx_a);
        registry.register("Bob Davis", addr(1001), tx_b);

        let delivered = Broadcaster::new(registry.clone()).broadcast("hello");

        assert_eq!(delivered, 2);
        assert_eq!(rx_a.try_recv().unwrap(), Message::text("hello".to_string()));
        assert_eq!(rx_b.try_recv().unwrap(), Message::text("hello".to_string()));
        assert!(rx_a.try_recv().is_err());
    }

    #[test]
    fn test_dead_client_does_not_block_others() {
        let registry = create_shared_registry();
        let (tx_dead, rx_dead) = mpsc::channel(8);
        let (tx_a, mut rx_a) = mpsc::channel(8);
        let (tx_b, mut rx_b) = mpsc::channel(8);
        let dead = registry.register("Dead Client", addr(999), tx_dead);
        registry.register("Alice Chen", addr(1000), tx_a);
        registry.register("Bob Davis", addr(1001), tx_b);
        drop(rx_dead);

        let delivered = Broadcaster::new(registry.clone()).broadcast("still here");

        assert_eq!(delivered, 2);
        assert_eq!(rx_a.try_recv().unwrap(), Message::text("still here".to_string()));
        assert_eq!(rx_b.try_recv().unwrap(), Message::text("still here".to_string()));
        assert!(!registry.contains(dead.id()));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_stalled_client_is_dropped() {
        let registry = create_shared_registry();
        let (tx_slow, mut rx_slow) = mpsc::channel(1);
        let (tx_a, mut rx_a) = mpsc::channel(8);
        let slow = registry.register("Slow Reader", addr(999), tx_slow);
        registry.register("Alice Chen", addr(1000), tx_a);
        let broadcaster = Broadcaster::new(registry.clone());

        assert_eq!(broadcaster.broadcast("one"), 2);
        assert!(registry.contains(slow.id()));

        // The slow client never drained "one", so "two" finds its queue full
        assert_eq!(broadcaster.broadcast("two"), 1);
        assert!(!registry.contains(slow.id()));
        assert_eq!(registry.len(), 1);

        assert_eq!(rx_a.try_recv().unwrap(), Message::text("one".to_string()));
        assert_eq!(rx_a.try_recv().unwrap(), Message::text("two".to_string()));
        assert_eq!(rx_slow.try_recv().unwrap(), Message::text("one".to_string()));
        assert!(rx_slow.try_recv().is_err());

        assert_eq!(broadcaster.broadcast("three"), 1);
    }

    #[test]
    fn test_broadcast_with_no_clients() {
        let registry = create_shared_registry();
        assert_eq!(Broadcaster::new(registry).broadcast("anyone?"), 0);
    }
}
