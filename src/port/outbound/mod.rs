//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies such as storage,
//! the historical rate API, forecasting, narrative generation and time.

pub mod clock;
pub mod forecast;
pub mod llm;
pub mod narrative;
pub mod rates;
pub mod store;
