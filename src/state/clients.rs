//! Registry of live client sockets and the broadcast fan-out over them.

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use crate::dto::ws::ServerMessage;

#[derive(Clone)]
/// Handle used to push messages to a connected client.
pub struct ClientConnection {
    /// Connection id shared with the player registry.
    pub id: Uuid,
    /// Writer-task channel for this socket.
    pub tx: mpsc::UnboundedSender<Message>,
}

/// Fan-out hub over every connected client socket.
///
/// Spectator screens connect without ever joining as players, so the hub is
/// keyed by connection id rather than by registered player.
#[derive(Default)]
pub struct ClientHub {
    connections: DashMap<Uuid, ClientConnection>,
}

impl ClientHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly accepted socket.
    pub fn insert(&self, connection: ClientConnection) {
        self.connections.insert(connection.id, connection);
    }

    /// Drop a socket, usually after its read loop ended.
    pub fn remove(&self, id: Uuid) {
        self.connections.remove(&id);
    }

    /// Send an event to every connected client.
    ///
    /// The payload is serialized once. Delivery errors are ignored; a closed
    /// writer is cleaned up by its own connection handler.
    pub fn broadcast(&self, event: &ServerMessage) {
        let Some(payload) = serialize(event) else {
            return;
        };
        for connection in self.connections.iter() {
            let _ = connection.tx.send(Message::Text(payload.clone().into()));
        }
    }

    /// Send an event to a single client, if it is still connected.
    pub fn send_to(&self, id: Uuid, event: &ServerMessage) {
        let Some(payload) = serialize(event) else {
            return;
        };
        if let Some(connection) = self.connections.get(&id) {
            let _ = connection.tx.send(Message::Text(payload.into()));
        }
    }
}

/// Serialize an outbound event, logging instead of failing on the (permanent)
/// serializer error.
fn serialize(event: &ServerMessage) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(payload) => Some(payload),
        Err(err) => {
            warn!(error = %err, "failed to serialize outbound event `{event:?}`");
            None
        }
    }
}
