//! WebSocket live-update transport.

mod server;
mod subscriber;

pub use server::{LiveServer, DEFAULT_SEND_TIMEOUT, PING, PONG};
pub use subscriber::WsSubscriber;
