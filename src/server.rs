use crate::error::RelayError;
use crate::handler::{handle_connection, Relay};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Bind `addr` and serve WebSocket clients until the process exits
pub async fn start_server(addr: &str, relay: Arc<Relay>) -> Result<(), RelayError> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("WebSocket server listening on {}", listener.local_addr()?);
    serve(listener, relay).await
}

/// Accept loop over an already-bound listener; one task per connection
pub async fn serve(listener: TcpListener, relay: Arc<Relay>) -> Result<(), RelayError> {
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!("Failed to accept connection: {}", e);
                continue;
            }
        };

        let relay = relay.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, addr, relay).await {
                tracing::error!("Client {} error: {}", addr, e);
            }
        });
    }
}
