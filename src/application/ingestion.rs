//! Message ingestion: rate-limit, parse, persist, publish.
//!
//! One [`IngestionPipeline::run`] drives one message stream sequentially,
//! in arrival order. Failures are contained per message; the stream only
//! ends when the source ends or shutdown is signalled.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::application::broadcast::BroadcastHub;
use crate::application::limiter::RateLimiter;
use crate::application::parser;
use crate::domain::{InboundMessage, MessageRecord, TickRecord};
use crate::port::inbound::MessageSource;
use crate::port::outbound::clock::Clock;
use crate::port::outbound::store::Storage;

/// Result of processing one message.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    pub message_saved: bool,
    /// Stored tick, when the message carried a price and the write succeeded.
    pub tick: Option<TickRecord>,
    /// A price was found but the tick could not be stored.
    pub tick_failed: bool,
}

/// Running totals for a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionStats {
    pub processed: u64,
    pub ticks: u64,
    pub failures: u64,
}

impl IngestionStats {
    fn record(&mut self, outcome: &Processed) {
        self.processed += 1;
        if outcome.tick.is_some() {
            self.ticks += 1;
        }
        if !outcome.message_saved {
            self.failures += 1;
        }
        if outcome.tick_failed {
            self.failures += 1;
        }
    }
}

/// Sequential processor for inbound channel messages.
pub struct IngestionPipeline {
    storage: Arc<dyn Storage>,
    hub: Arc<BroadcastHub>,
    limiter: Arc<RateLimiter>,
    clock: Arc<dyn Clock>,
}

impl IngestionPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        hub: Arc<BroadcastHub>,
        limiter: Arc<RateLimiter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            storage,
            hub,
            limiter,
            clock,
        }
    }

    /// Drive a message source until it ends or shutdown is signalled.
    ///
    /// Shutdown is honoured while waiting for the next message and during
    /// the rate-limit wait. A message that has passed the limiter is always
    /// processed to completion.
    pub async fn run<S>(&self, mut source: S, mut shutdown: watch::Receiver<bool>) -> IngestionStats
    where
        S: MessageSource,
    {
        let mut stats = IngestionStats::default();
        let name = source.name().to_string();
        info!(source = %name, "Ingestion started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            let message = tokio::select! {
                message = source.next_message() => match message {
                    Some(message) => message,
                    None => {
                        info!(source = %name, "Message source ended");
                        break;
                    }
                },
                _ = shutdown.changed() => break,
            };

            tokio::select! {
                _ = self.limiter.acquire() => {}
                _ = shutdown.changed() => break,
            }

            let outcome = self.process(&message).await;
            stats.record(&outcome);
        }

        info!(
            source = %name,
            processed = stats.processed,
            ticks = stats.ticks,
            failures = stats.failures,
            "Ingestion stopped"
        );
        stats
    }

    /// Parse and persist one message without rate limiting.
    ///
    /// The message record is written whether or not a price was found. A
    /// tick is published only after it has been stored.
    pub async fn process(&self, message: &InboundMessage) -> Processed {
        let timestamp = self.clock.now();
        let parsed = parser::parse(&message.text);

        let record = MessageRecord::from_inbound(message, timestamp, parsed.is_some());
        let message_saved = match self.storage.append_message(&record).await {
            Ok(()) => true,
            Err(e) => {
                error!(channel = %message.channel, message_id = message.message_id, error = %e, "Failed to save message");
                false
            }
        };

        let Some(parsed) = parsed else {
            debug!(channel = %message.channel, message_id = message.message_id, "No price in message");
            return Processed {
                message_saved,
                tick: None,
                tick_failed: false,
            };
        };

        let tick = TickRecord::from_parsed(
            parsed,
            timestamp,
            message.channel.as_str(),
            message.text.as_str(),
            Some(message.message_id),
        );

        if let Err(e) = self.storage.append_tick(&tick).await {
            error!(pair = %tick.pair, price = tick.price, error = %e, "Failed to save tick");
            return Processed {
                message_saved,
                tick: None,
                tick_failed: true,
            };
        }

        info!(
            pair = %tick.pair,
            price = tick.price,
            price_type = %tick.price_type,
            channel = %tick.source_channel,
            "Saved tick"
        );

        if let Err(e) = self.hub.publish_price(&tick).await {
            warn!(pair = %tick.pair, error = %e, "Failed to publish price update");
        }

        Processed {
            message_saved,
            tick: Some(tick),
            tick_failed: false,
        }
    }
}
