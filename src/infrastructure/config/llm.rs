//! LLM provider configuration.
//!
//! Settings for the narrative model. The API key is read from
//! `OPENAI_API_KEY` at runtime, never from the config file.

use serde::Deserialize;

/// OpenAI narrative settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LlmConfig {
    /// Model identifier.
    ///
    /// Defaults to "gpt-4o".
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens in the response. Defaults to 200.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Sampling temperature. Defaults to 0.7.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o".into()
}

const fn default_max_tokens() -> usize {
    200
}

const fn default_temperature() -> f64 {
    0.7
}
