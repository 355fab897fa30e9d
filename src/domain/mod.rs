//! Exchange-rate domain types.
//!
//! Pure values with no I/O: pairs, ticks, messages, bars, signals,
//! forecasts and the live events built from them.

mod analysis;
mod bar;
mod event;
mod forecast;
mod message;
mod pair;
mod signal;
mod tick;

pub mod error;

pub use analysis::MarketAnalysis;
pub use bar::{DailyBar, SOURCE_FULUS, SOURCE_SYNTHETIC};
pub use event::{LiveEvent, PriceUpdate, WELCOME_MESSAGE};
pub use forecast::{ForecastPoint, TREND_THRESHOLD};
pub use message::{truncate_chars, InboundMessage, MessageExcerpt, MessageRecord, EXCERPT_CHARS};
pub use pair::CurrencyPair;
pub use signal::{ForecastTrend, Signal, SignalResult};
pub use tick::{validate_price, ParsedTick, PriceType, TickRecord, MAX_PRICE};
