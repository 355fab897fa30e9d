//! Per-channel message streams.
//!
//! A transport pushes every message into a [`ChannelRouter`], which hands it
//! to the bounded queue of the channel it came from. Each queue is drained
//! by its own ingestion pipeline through [`ChannelStream`], so channels are
//! processed independently and in arrival order.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::InboundMessage;
use crate::port::inbound::MessageSource;

/// Queue depth per channel before the transport starts dropping.
pub const CHANNEL_QUEUE: usize = 256;

/// Normalise a channel reference: `@EwanLibya`, `ewanlibya` and
/// `https://t.me/EwanLibya` all map to `ewanlibya`.
pub fn channel_key(channel: &str) -> String {
    let trimmed = channel.trim();
    let name = trimmed
        .strip_prefix("https://t.me/")
        .or_else(|| trimmed.strip_prefix("t.me/"))
        .unwrap_or(trimmed);
    name.trim_start_matches('@').to_lowercase()
}

/// Routes inbound messages to one queue per monitored channel.
#[derive(Clone)]
pub struct ChannelRouter {
    routes: HashMap<String, mpsc::Sender<InboundMessage>>,
}

/// Receiving end for one channel.
pub struct ChannelStream {
    name: String,
    receiver: mpsc::Receiver<InboundMessage>,
}

impl ChannelRouter {
    /// Create a router and one stream per channel. Duplicate channels
    /// share the first stream.
    pub fn new<I, S>(channels: I) -> (Self, Vec<ChannelStream>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut routes = HashMap::new();
        let mut streams = Vec::new();
        for channel in channels {
            let key = channel_key(channel.as_ref());
            if key.is_empty() || routes.contains_key(&key) {
                continue;
            }
            let (sender, receiver) = mpsc::channel(CHANNEL_QUEUE);
            routes.insert(key.clone(), sender);
            streams.push(ChannelStream {
                name: key,
                receiver,
            });
        }
        (Self { routes }, streams)
    }

    pub fn is_monitored(&self, channel: &str) -> bool {
        self.routes.contains_key(&channel_key(channel))
    }

    /// Queue a message for its channel. Returns `false` when the channel is
    /// not monitored, its queue is full, or its stream was dropped.
    pub fn route(&self, message: InboundMessage) -> bool {
        let key = channel_key(&message.channel);
        let Some(sender) = self.routes.get(&key) else {
            debug!(channel = %message.channel, "Ignoring unmonitored channel");
            return false;
        };
        match sender.try_send(message) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(message)) => {
                warn!(channel = %message.channel, message_id = message.message_id, "Channel queue full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(message)) => {
                warn!(channel = %message.channel, "Channel stream closed");
                false
            }
        }
    }
}

#[async_trait]
impl MessageSource for ChannelStream {
    async fn next_message(&mut self) -> Option<InboundMessage> {
        self.receiver.recv().await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_keys_are_normalised() {
        assert_eq!(channel_key("@EwanLibya"), "ewanlibya");
        assert_eq!(channel_key(" ewanlibya "), "ewanlibya");
        assert_eq!(channel_key("https://t.me/AlMushir"), "almushir");
    }

    #[tokio::test]
    async fn routes_to_matching_stream_only() {
        let (router, mut streams) = ChannelRouter::new(["@EwanLibya", "@AlMushir", "@ewanlibya"]);
        assert_eq!(streams.len(), 2);

        assert!(router.route(InboundMessage::new("EwanLibya", 1, "a")));
        assert!(router.route(InboundMessage::new("almushir", 2, "b")));
        assert!(!router.route(InboundMessage::new("other", 3, "c")));

        let mut mushir = streams.pop().unwrap();
        let mut ewan = streams.pop().unwrap();
        assert_eq!(ewan.name(), "ewanlibya");
        assert_eq!(ewan.next_message().await.unwrap().message_id, 1);
        assert_eq!(mushir.next_message().await.unwrap().message_id, 2);
    }

    #[tokio::test]
    async fn stream_ends_when_router_dropped() {
        let (router, mut streams) = ChannelRouter::new(["@a"]);
        drop(router);
        assert!(streams[0].next_message().await.is_none());
    }

    #[test]
    fn dropped_stream_rejects_messages() {
        let (router, streams) = ChannelRouter::new(["@a"]);
        drop(streams);
        assert!(!router.route(InboundMessage::new("a", 1, "x")));
    }
}
