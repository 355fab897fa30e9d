//! Outbound adapters (driven side).

pub mod clock;
pub mod forecast;
pub mod llm;
pub mod memory;
pub mod narrative;
pub mod rates;
pub mod sqlite;
