//! Subscriber handle over the write half of a WebSocket.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::SinkExt;
use tokio::net::TcpStream;
use tokio::sync::{watch, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::error::{Error, Result};
use crate::port::inbound::Subscriber;

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Sends text frames to one connected client.
///
/// The sink is shared between broadcasts and the connection's own
/// keepalive replies, so writes are serialised by a mutex. A send that
/// does not complete within the timeout counts as a failure. The first
/// failure flips the [`dropped`](Self::dropped) flag, and the connection
/// task closes the socket once it sees it.
pub struct WsSubscriber {
    sink: Mutex<WsSink>,
    timeout: Duration,
    dropped: watch::Sender<bool>,
}

impl WsSubscriber {
    pub fn new(sink: WsSink, timeout: Duration) -> Self {
        Self {
            sink: Mutex::new(sink),
            timeout,
            dropped: watch::channel(false).0,
        }
    }

    /// Flag that becomes true after the first failed send. It never
    /// changes otherwise, so any change notification means dropped.
    pub fn dropped(&self) -> watch::Receiver<bool> {
        self.dropped.subscribe()
    }

    /// Send a close frame. Errors are ignored; the peer may already be gone.
    pub async fn close(&self) {
        let close = async {
            let mut sink = self.sink.lock().await;
            let _ = sink.close().await;
        };
        // A peer that stopped reading never drains the close frame.
        let _ = tokio::time::timeout(self.timeout, close).await;
    }
}

#[async_trait]
impl Subscriber for WsSubscriber {
    async fn send(&self, text: &str) -> Result<()> {
        let frame = Message::Text(text.to_string());
        let write = async {
            let mut sink = self.sink.lock().await;
            sink.send(frame).await
        };
        let result = match tokio::time::timeout(self.timeout, write).await {
            Ok(result) => result.map_err(Error::from),
            Err(_) => Err(Error::Send(format!(
                "timed out after {}ms",
                self.timeout.as_millis()
            ))),
        };
        if result.is_err() {
            self.dropped.send_replace(true);
        }
        result
    }
}
