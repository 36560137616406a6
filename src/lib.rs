//! Pricewatch - ticker price monitor
//! Polls a 24h ticker and alerts when the price moves past a threshold over a rolling interval

pub mod app;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use domain::price::{PriceFeed, PriceMonitor, PriceMonitorConfig};
pub use infrastructure::{RetryPolicy, RetryingQuoteSource, TickerApiClient};
pub use report::ConsoleReporter;
pub use shared::types::{Alert, AlertKind, Observation};
