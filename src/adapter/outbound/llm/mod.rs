//! LLM adapter modules.
//!
//! Provides implementations of the [`Llm`](crate::port::outbound::llm::Llm) trait.

pub mod openai;

pub use openai::OpenAi;
