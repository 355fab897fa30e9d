//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (message feeds, databases, rate APIs, live subscribers, etc.).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Message │            │   Store     │              │Subscriber │
//! │ Source  │            │   Adapter   │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`inbound::MessageSource`] - Channel message feed (Telegram)
//! - [`inbound::Subscriber`] - Live-update connection handle (WebSocket)
//! - [`outbound::store`] - Tick, message and bar persistence
//! - [`outbound::rates::RateSource`] - Authoritative historical rates
//! - [`outbound::forecast::Forecaster`] - Time-series forecasting
//! - [`outbound::narrative::Narrator`] - Free-text market commentary
//! - [`outbound::clock::Clock`] - Injectable time source

pub mod inbound;
pub mod outbound;
