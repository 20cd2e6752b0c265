//! WebSocket transport layer

pub mod handler;
pub mod protocol;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use protocol::ServerMsg;

/// Live connections and their private outbound channels. Broadcast
/// traffic (snapshots) goes over the world's broadcast channel; this
/// registry carries messages addressed to a single connection, like
/// the `dead` notification.
#[derive(Default)]
pub struct ConnectionRegistry {
    senders: DashMap<Uuid, mpsc::UnboundedSender<ServerMsg>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            senders: DashMap::new(),
        }
    }

    /// Register a connection, returning the receiving half of its
    /// private channel
    pub fn register(&self, conn_id: Uuid) -> mpsc::UnboundedReceiver<ServerMsg> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.insert(conn_id, tx);
        rx
    }

    pub fn unregister(&self, conn_id: Uuid) {
        self.senders.remove(&conn_id);
    }

    /// Deliver a message to one connection; dropped silently if the
    /// connection is already gone
    pub fn send_to(&self, conn_id: Uuid, msg: ServerMsg) {
        if let Some(tx) = self.senders.get(&conn_id) {
            if tx.send(msg).is_err() {
                debug!(conn_id = %conn_id, "Private channel closed");
            }
        }
    }

    pub fn count(&self) -> usize {
        self.senders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targeted_send_reaches_only_the_addressee() {
        let registry = ConnectionRegistry::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut rx_a = registry.register(a);
        let mut rx_b = registry.register(b);

        registry.send_to(a, ServerMsg::Dead);
        assert!(matches!(rx_a.try_recv(), Ok(ServerMsg::Dead)));
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn send_to_unknown_connection_is_a_noop() {
        let registry = ConnectionRegistry::new();
        registry.send_to(Uuid::new_v4(), ServerMsg::Dead);
        assert_eq!(registry.count(), 0);
    }
}
