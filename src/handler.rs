//! Per-connection lifecycle and message dispatch

use crate::broadcaster::Broadcaster;
use crate::command::{parse_message, Inbound};
use crate::command_log::CommandLog;
use crate::error::RelayError;
use crate::names::random_display_name;
use crate::rates::RateFetcher;
use crate::registry::{ClientHandle, ClientId, SharedRegistry, CLIENT_QUEUE_CAPACITY};
use crate::types::ExchangeQuery;
use chrono::Local;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

/// Shared state every connection handler works against
pub struct Relay {
    registry: SharedRegistry,
    broadcaster: Broadcaster,
    fetcher: RateFetcher,
    command_log: CommandLog,
}

impl Relay {
    pub fn new(registry: SharedRegistry, fetcher: RateFetcher, command_log: CommandLog) -> Self {
        Self {
            broadcaster: Broadcaster::new(registry.clone()),
            registry,
            fetcher,
            command_log,
        }
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    /// Handle one inbound text message from `client`.
    ///
    /// Returns once the message is fully processed, broadcast included.
    pub async fn handle_text(&self, client: &ClientHandle, text: &str) {
        match parse_message(text) {
            Ok(Inbound::Chat(message)) => {
                self.broadcaster
                    .broadcast(&format!("{}: {}", client.name(), message));
            }
            Ok(Inbound::Exchange(query)) => {
                self.run_exchange(client, text, &query).await;
            }
            Err(e) => {
                tracing::debug!("Rejected command from {}: {:?}", client.addr(), text);
                reply(client, &e.to_string());
            }
        }
    }

    async fn run_exchange(&self, client: &ClientHandle, raw: &str, query: &ExchangeQuery) {
        if let Err(e) = self.command_log.append(Local::now(), raw).await {
            tracing::warn!(
                "Failed to write command log {}: {}",
                self.command_log.path().display(),
                e
            );
        }

        match self.fetcher.fetch(query).await {
            Ok(result) => {
                self.broadcaster.broadcast(&result.to_report());
            }
            Err(e) => {
                tracing::warn!("Exchange command from {} failed: {}", client.addr(), e);
                reply(client, &format!("An error occurred: {}", e));
            }
        }
    }
}

/// Sender-only reply
fn reply(client: &ClientHandle, text: &str) {
    if client.send_text(text).is_err() {
        tracing::debug!("Client {} gone before reply", client.addr());
    }
}

/// Unregisters the client when the handler exits, whichever way it exits
struct Registration {
    registry: SharedRegistry,
    id: ClientId,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}

/// Drive one client connection from handshake to unregistration
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    relay: Arc<Relay>,
) -> Result<(), RelayError> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut write, mut read) = ws_stream.split();

    let (tx, mut rx) = mpsc::channel::<Message>(CLIENT_QUEUE_CAPACITY);
    let client = relay.registry().register(random_display_name(), addr, tx);
    let registration = Registration {
        registry: relay.registry().clone(),
        id: client.id(),
    };

    // Outbound frames from broadcasts and replies
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = write.send(msg).await {
                tracing::debug!("Failed to send to client {}: {}", addr, e);
                break;
            }
        }
    });

    let outcome = loop {
        match read.next().await {
            Some(Ok(Message::Text(text))) => {
                if !relay.registry().contains(client.id()) {
                    tracing::debug!("Client {} was dropped as stalled, closing", addr);
                    break Ok(());
                }
                relay.handle_text(&client, text.as_str()).await;
            }
            Some(Ok(Message::Ping(data))) => {
                let _ = client.send(Message::Pong(data));
            }
            Some(Ok(Message::Close(_))) => {
                // Keep reading: the next poll flushes the Close reply, then the stream ends
                tracing::debug!("Client {} sent close", addr);
            }
            Some(Ok(_)) => {}
            Some(Err(WsError::ConnectionClosed))
            | Some(Err(WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake))) => {
                break Ok(());
            }
            Some(Err(e)) => {
                tracing::debug!("Client {} error: {}", addr, e);
                break Err(e.into());
            }
            None => break Ok(()),
        }
    };

    drop(registration);
    writer.abort();
    tracing::debug!("Client {} handler finished", addr);
    outcome
}
