//! Infrastructure layer - HTTP ticker client and transport resilience

pub mod retry;
pub mod ticker_client;

pub use retry::{RetryPolicy, RetryingQuoteSource};
pub use ticker_client::{TickerApiClient, DEFAULT_TICKER_ENDPOINT};
