//! Inbound adapters (driving side): CLI, message feeds and live connections.

pub mod cli;
pub mod feed;
#[cfg(feature = "telegram")]
pub mod telegram;
pub mod websocket;
