//! LLM completion port for narrative adapters.

use async_trait::async_trait;

use crate::error::Result;

/// Client for large language model text completion.
///
/// Implementations wrap specific providers and handle authentication
/// and response parsing.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Return the provider name for logging.
    fn name(&self) -> &'static str;

    /// Send a completion request with a system role and return the text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}
