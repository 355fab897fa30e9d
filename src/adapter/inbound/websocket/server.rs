//! Live-update WebSocket server.
//!
//! Each accepted connection gets a `connected` greeting, is registered with
//! the [`BroadcastHub`], and then only ever reads: a literal `ping` text
//! frame is answered with `pong`, a close frame or read error ends it.
//! A failed send ends it as well, since the hub has already evicted it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::application::broadcast::BroadcastHub;
use crate::domain::LiveEvent;
use crate::error::Result;
use crate::port::inbound::Subscriber;
use crate::port::outbound::clock::Clock;

use super::subscriber::WsSubscriber;

/// Keepalive request and reply text.
pub const PING: &str = "ping";
pub const PONG: &str = "pong";

/// Default bound on a single frame write.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Accepts WebSocket subscribers for the hub.
#[derive(Clone)]
pub struct LiveServer {
    hub: Arc<BroadcastHub>,
    clock: Arc<dyn Clock>,
    send_timeout: Duration,
}

impl LiveServer {
    pub fn new(hub: Arc<BroadcastHub>, clock: Arc<dyn Clock>) -> Self {
        Self {
            hub,
            clock,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Bind `addr` and serve until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn bind_and_serve(self, addr: &str, shutdown: watch::Receiver<bool>) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown).await;
        Ok(())
    }

    /// Accept connections from `listener` until `shutdown` flips to true.
    pub async fn serve(self, listener: TcpListener, mut shutdown: watch::Receiver<bool>) {
        if let Ok(addr) = listener.local_addr() {
            info!(addr = %addr, "Live update server listening");
        }

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let server = self.clone();
                        tokio::spawn(async move { server.handle(stream, peer).await });
                    }
                    Err(e) => error!(error = %e, "Accept failed"),
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Live update server stopped");
    }

    async fn handle(&self, stream: TcpStream, peer: SocketAddr) {
        let ws = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                warn!(peer = %peer, error = %e, "WebSocket handshake failed");
                return;
            }
        };

        let (sink, mut reader) = ws.split();
        let subscriber = Arc::new(WsSubscriber::new(sink, self.send_timeout));

        let greeting = match serde_json::to_string(&LiveEvent::connected(self.clock.now())) {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Failed to encode greeting");
                return;
            }
        };
        if let Err(e) = subscriber.send(&greeting).await {
            warn!(peer = %peer, error = %e, "Failed to greet subscriber");
            return;
        }

        // Subscribe before registering so no failed send goes unseen.
        let mut dropped = subscriber.dropped();
        let id = self.hub.connect(subscriber.clone());
        info!(peer = %peer, subscriber = %id, active = self.hub.len(), "Subscriber joined");

        loop {
            tokio::select! {
                frame = reader.next() => match frame {
                    Some(Ok(Message::Text(text))) if text == PING => {
                        if let Err(e) = subscriber.send(PONG).await {
                            debug!(subscriber = %id, error = %e, "Keepalive reply failed");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!(subscriber = %id, error = %e, "WebSocket read error");
                        break;
                    }
                },
                // A failed send evicts the subscriber from the hub; end the
                // connection too so the client reconnects.
                _ = dropped.changed() => {
                    info!(peer = %peer, subscriber = %id, "Subscriber dropped after failed send");
                    break;
                }
            }
        }

        self.hub.disconnect(id);
        subscriber.close().await;
        info!(peer = %peer, subscriber = %id, active = self.hub.len(), "Subscriber left");
    }
}
