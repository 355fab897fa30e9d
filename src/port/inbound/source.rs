//! Message feed port.

use async_trait::async_trait;

use crate::domain::InboundMessage;

/// A stream of inbound channel messages.
///
/// The transport pushes; ingestion pulls one message at a time, so
/// messages are handled in arrival order.
#[async_trait]
pub trait MessageSource: Send {
    /// Wait for the next message. `None` means the feed has ended.
    async fn next_message(&mut self) -> Option<InboundMessage>;

    /// Name used in logs (channel or feed name).
    fn name(&self) -> &str;
}
