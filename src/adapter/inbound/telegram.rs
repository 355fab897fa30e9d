//! Telegram channel-post feed.
//!
//! Listens for posts in the monitored channels and routes them into
//! per-channel streams. Requires the `telegram` feature to be enabled.
//!
//! Bots only receive `channel_post` updates from channels they administer.
//! Public channels the bot is not an admin of stay silent.

use teloxide::prelude::*;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::InboundMessage;
use crate::error::{ConfigError, Error, Result};

use super::feed::{ChannelRouter, ChannelStream};

/// Bot-backed channel listener.
pub struct TelegramFeed {
    bot: Bot,
    router: ChannelRouter,
}

impl TelegramFeed {
    /// Create a feed for `channels`, returning the streams to ingest.
    pub fn new<I, S>(bot_token: &str, channels: I) -> (Self, Vec<ChannelStream>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (router, streams) = ChannelRouter::new(channels);
        let feed = Self {
            bot: Bot::new(bot_token),
            router,
        };
        (feed, streams)
    }

    /// Create a feed with the token from `TELEGRAM_BOT_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or empty.
    pub fn from_env<I, S>(channels: I) -> Result<(Self, Vec<ChannelStream>)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let token = std::env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(Error::Config(ConfigError::MissingField {
                field: "TELEGRAM_BOT_TOKEN",
            }))?;
        Ok(Self::new(&token, channels))
    }

    /// Dispatch channel posts until `shutdown` flips to true.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let router = self.router;
        let handler = Update::filter_channel_post().endpoint(move |msg: Message| {
            let router = router.clone();
            async move {
                if let Some(inbound) = to_inbound(&msg) {
                    router.route(inbound);
                }
                respond(())
            }
        });

        let mut dispatcher = Dispatcher::builder(self.bot, handler).build();
        let token = dispatcher.shutdown_token();

        tokio::spawn(async move {
            while !*shutdown.borrow() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
            match token.shutdown() {
                Ok(done) => done.await,
                Err(e) => warn!(error = %e, "Telegram dispatcher was not running"),
            }
        });

        info!("Telegram feed started");
        dispatcher.dispatch().await;
        info!("Telegram feed stopped");
    }
}

/// Channel posts carry text, or a caption when they carry media.
fn to_inbound(msg: &Message) -> Option<InboundMessage> {
    let text = msg.text().or_else(|| msg.caption())?;
    let channel = msg
        .chat
        .username()
        .map_or_else(|| msg.chat.id.0.to_string(), str::to_string);
    Some(InboundMessage::new(channel, i64::from(msg.id.0), text))
}
