//! lydwatch - Real-time Libyan dinar rate monitor.
//!
//! Extracts price ticks from Telegram channel posts, derives RSI and
//! panic-index signals, streams live updates to WebSocket subscribers and
//! keeps daily bars reconciled with the fulus.ly rate API.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **`domain`** - Pure value types: pairs, ticks, messages, bars, signals
//! - **`port`** - Traits for storage, rates, forecasting, narratives, feeds
//!   and subscribers
//! - **`application`** - Parser, rate limiter, ingestion, indicators, signal
//!   generator, broadcast hub, sync scheduler and analysis
//! - **`adapter`** - SQLite and in-memory stores, HTTP rate client,
//!   Telegram feed, WebSocket server, OpenAI narrator, CLI
//! - **`infrastructure`** - Configuration, wiring and the runtime
//!
//! # Features
//!
//! - `telegram` - Enable the Telegram channel feed (default)
//!
//! # Example
//!
//! ```
//! use lydwatch::application::parser;
//! use lydwatch::domain::PriceType;
//!
//! let tick = parser::parse("سعر الدولار اليوم 7.15 دينار").unwrap();
//! assert_eq!(tick.pair().as_str(), "USD/LYD");
//! assert_eq!(tick.price(), 7.15);
//! assert_eq!(tick.price_type(), PriceType::Mid);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
