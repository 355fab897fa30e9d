//! Live subscriber port.

use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

/// Identity assigned to a subscriber when it registers with the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One live connection able to receive text frames.
///
/// Implementations must be thread-safe: the hub may call `send` from
/// several producers while the connection's own reader also replies
/// to keepalives.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Deliver one text frame. An error marks the subscriber as dead.
    async fn send(&self, text: &str) -> Result<()>;
}
