//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases: parsing, ingestion,
//! indicators and signals, fan-out, bar sync and on-demand analysis.

pub mod analysis;
pub mod broadcast;
pub mod indicator;
pub mod ingestion;
pub mod limiter;
pub mod parser;
pub mod signal;
pub mod sync;
