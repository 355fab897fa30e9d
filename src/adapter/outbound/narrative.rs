//! LLM-backed market narrator.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::truncate_chars;
use crate::error::{Error, Result};
use crate::port::outbound::llm::Llm;
use crate::port::outbound::narrative::{NarrativeContext, Narrator};

/// Excerpts included in the prompt.
pub const PROMPT_EXCERPTS: usize = 5;
/// Characters kept from each excerpt in the prompt.
pub const PROMPT_EXCERPT_CHARS: usize = 100;

const SYSTEM_PROMPT: &str = "You are a financial analyst specializing in Libyan currency markets.";

/// Writes short market commentary with an LLM.
pub struct LlmNarrator {
    llm: Arc<dyn Llm>,
}

impl LlmNarrator {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }
}

/// Build the user prompt from structured facts.
pub fn build_prompt(context: &NarrativeContext) -> String {
    let mut summaries = String::new();
    for excerpt in context.excerpts.iter().take(PROMPT_EXCERPTS) {
        let _ = writeln!(
            summaries,
            "- {}: {}",
            excerpt.channel,
            truncate_chars(&excerpt.text, PROMPT_EXCERPT_CHARS)
        );
    }

    format!(
        "Analyze the following data and provide a concise explanation (2-3 sentences) \
         of why the {pair} rate is moving.\n\n\
         Current Price: {price}\n\
         RSI: {rsi}\n\
         Market Panic Index: {panic}/100\n\
         Signal: {signal} (Confidence: {confidence}%)\n\n\
         Recent Telegram Messages:\n{summaries}\n\
         Provide a clear, actionable summary of market conditions and the reasoning \
         behind the current {signal} signal.",
        pair = context.pair,
        price = context.current_price,
        rsi = context.rsi,
        panic = context.panic_index,
        signal = context.signal,
        confidence = context.confidence,
    )
}

#[async_trait]
impl Narrator for LlmNarrator {
    async fn narrate(&self, context: &NarrativeContext) -> Result<String> {
        let text = self.llm.complete(SYSTEM_PROMPT, &build_prompt(context)).await?;
        if text.trim().is_empty() {
            return Err(Error::Parse(format!("{} returned an empty completion", self.llm.name())));
        }
        Ok(text)
    }
}
