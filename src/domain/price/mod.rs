//! Price domain - price feed and change monitoring

mod price_monitor;
mod price_feed;
mod price_analyzer;

pub use price_monitor::{MonitorStats, PriceMonitor, PriceMonitorConfig};
pub use price_feed::PriceFeed;
pub use price_analyzer::PriceAnalyzer;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Instant;

use crate::shared::errors::FeedError;
use crate::shared::types::{Alert, Observation};

/// 24h ticker fields as reported by the quote source.
/// Values may arrive as JSON strings or numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TickerQuote {
    #[serde(rename = "lastPrice")]
    pub last_price: Decimal,
    #[serde(rename = "priceChange")]
    pub price_change: Decimal,
    #[serde(rename = "priceChangePercent")]
    pub price_change_percent: Decimal,
}

impl TickerQuote {
    pub fn into_observation(self, timestamp: Instant) -> Observation {
        Observation::new(self.last_price, self.price_change, self.price_change_percent, timestamp)
    }
}

/// Source of ticker quotes, one request per call
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quote(&self) -> Result<TickerQuote, FeedError>;
}

/// Text sink for per-poll status and per-interval alerts
pub trait AlertSink {
    fn status(&mut self, observation: &Observation) -> std::io::Result<()>;

    fn alert(&mut self, alert: &Alert) -> std::io::Result<()>;
}
