//! Inbound (driving) ports consumed by inbound adapters.
//!
//! - [`MessageSource`]: raw channel messages pushed into ingestion
//! - [`Subscriber`]: a live connection that receives fan-out events

mod source;
mod subscriber;

pub use source::MessageSource;
pub use subscriber::{Subscriber, SubscriberId};
