//! Fan-out of live events to connected subscribers.
//!
//! The hub owns the active subscriber set. Connection handlers register and
//! remove handles concurrently while producers broadcast; each broadcast
//! works on a snapshot, so mutations during a pass never disturb it.

use std::sync::Arc;

use dashmap::DashMap;
use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::domain::{LiveEvent, MarketAnalysis, TickRecord};
use crate::error::Result;
use crate::port::inbound::{Subscriber, SubscriberId};

/// Outcome of one broadcast pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub evicted: usize,
}

/// Shared registry of live subscribers.
///
/// Constructed once at startup and handed out as `Arc<BroadcastHub>` to
/// every component that publishes or manages connections.
#[derive(Default)]
pub struct BroadcastHub {
    subscribers: DashMap<SubscriberId, Arc<dyn Subscriber>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber and return its identity.
    pub fn connect(&self, subscriber: Arc<dyn Subscriber>) -> SubscriberId {
        let id = SubscriberId::generate();
        self.subscribers.insert(id, subscriber);
        debug!(subscriber = %id, active = self.subscribers.len(), "Subscriber connected");
        id
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn disconnect(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.remove(&id).is_some();
        if removed {
            debug!(subscriber = %id, active = self.subscribers.len(), "Subscriber disconnected");
        }
        removed
    }

    pub fn is_connected(&self, id: SubscriberId) -> bool {
        self.subscribers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Serialize once and deliver to every active subscriber.
    ///
    /// Sends run concurrently. Subscribers whose send failed are removed
    /// after the whole pass completes.
    pub async fn broadcast(&self, event: &LiveEvent) -> Result<BroadcastReport> {
        let text = serde_json::to_string(event)?;

        let snapshot: Vec<(SubscriberId, Arc<dyn Subscriber>)> = self
            .subscribers
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();

        let results = join_all(snapshot.iter().map(|(id, subscriber)| {
            let text = text.as_str();
            async move { (*id, subscriber.send(text).await) }
        }))
        .await;

        let mut report = BroadcastReport::default();
        for (id, result) in results {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(subscriber = %id, event = event.kind(), error = %e, "Send failed, evicting subscriber");
                    if self.subscribers.remove(&id).is_some() {
                        report.evicted += 1;
                    }
                }
            }
        }

        debug!(
            event = event.kind(),
            delivered = report.delivered,
            evicted = report.evicted,
            "Broadcast complete"
        );
        Ok(report)
    }

    /// Publish a `price_update` for a stored tick.
    pub async fn publish_price(&self, tick: &TickRecord) -> Result<BroadcastReport> {
        self.broadcast(&LiveEvent::price_update(tick)).await
    }

    /// Publish an `analysis_update`.
    pub async fn publish_analysis(&self, analysis: MarketAnalysis) -> Result<BroadcastReport> {
        self.broadcast(&LiveEvent::analysis_update(analysis)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use parking_lot::Mutex;

    use crate::error::Error;

    #[derive(Default)]
    struct Recording {
        frames: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Subscriber for Recording {
        async fn send(&self, text: &str) -> Result<()> {
            self.frames.lock().push(text.to_string());
            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl Subscriber for Broken {
        async fn send(&self, _text: &str) -> Result<()> {
            Err(Error::Send("connection reset".into()))
        }
    }

    #[tokio::test]
    async fn failed_subscriber_is_evicted_others_receive() {
        let hub = BroadcastHub::new();
        let a = Arc::new(Recording::default());
        let b = Arc::new(Recording::default());
        hub.connect(a.clone());
        let broken = hub.connect(Arc::new(Broken));
        hub.connect(b.clone());

        let report = hub.broadcast(&LiveEvent::connected(Utc::now())).await.unwrap();

        assert_eq!(report, BroadcastReport { delivered: 2, evicted: 1 });
        assert_eq!(a.frames.lock().len(), 1);
        assert_eq!(b.frames.lock().len(), 1);
        assert!(!hub.is_connected(broken));
        assert_eq!(hub.len(), 2);
    }

    #[tokio::test]
    async fn all_subscribers_receive_identical_text() {
        let hub = BroadcastHub::new();
        let a = Arc::new(Recording::default());
        let b = Arc::new(Recording::default());
        hub.connect(a.clone());
        hub.connect(b.clone());

        hub.broadcast(&LiveEvent::connected(Utc::now())).await.unwrap();

        assert_eq!(*a.frames.lock(), *b.frames.lock());
        let value: serde_json::Value = serde_json::from_str(&a.frames.lock()[0]).unwrap();
        assert_eq!(value["type"], "connected");
    }

    #[tokio::test]
    async fn broadcast_with_no_subscribers_is_noop() {
        let hub = BroadcastHub::new();
        let report = hub.broadcast(&LiveEvent::connected(Utc::now())).await.unwrap();
        assert_eq!(report, BroadcastReport::default());
    }

    #[test]
    fn disconnect_is_idempotent() {
        let hub = BroadcastHub::new();
        let id = hub.connect(Arc::new(Recording::default()));
        assert!(hub.disconnect(id));
        assert!(!hub.disconnect(id));
        assert!(hub.is_empty());
    }

    #[tokio::test]
    async fn concurrent_connects_during_broadcast() {
        let hub = Arc::new(BroadcastHub::new());
        for _ in 0..10 {
            hub.connect(Arc::new(Recording::default()));
        }

        let connector = {
            let hub = hub.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    let id = hub.connect(Arc::new(Recording::default()));
                    tokio::task::yield_now().await;
                    hub.disconnect(id);
                }
            })
        };
        for _ in 0..20 {
            hub.broadcast(&LiveEvent::connected(Utc::now())).await.unwrap();
        }
        connector.await.unwrap();

        assert_eq!(hub.len(), 10);
    }
}
