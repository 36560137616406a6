//! Transport retry wrapper for quote sources

use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use crate::domain::price::{QuoteSource, TickerQuote};
use crate::shared::errors::FeedError;
use crate::shared::utils::backoff_delay;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Seconds; the delay before retry `n` is `backoff_factor * 2^(n-1)`.
    pub backoff_factor: f64,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_factor: 0.3,
            max_backoff: Duration::from_secs(120),
        }
    }
}

/// Retries transport failures of the inner source with exponential backoff.
/// Parse errors pass through untouched.
pub struct RetryingQuoteSource<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: QuoteSource> RetryingQuoteSource<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<S: QuoteSource> QuoteSource for RetryingQuoteSource<S> {
    async fn fetch_quote(&self) -> Result<TickerQuote, FeedError> {
        let mut retries = 0;

        loop {
            match self.inner.fetch_quote().await {
                Ok(quote) => return Ok(quote),
                Err(e) if e.is_retryable() => {
                    if retries >= self.policy.max_retries {
                        return Err(FeedError::Network {
                            attempts: retries + 1,
                            last_error: e.to_string(),
                        });
                    }
                    retries += 1;
                    let delay = backoff_delay(self.policy.backoff_factor, retries, self.policy.max_backoff);
                    warn!(
                        "🔄 Ticker request failed ({}), retrying in {:?} (retry {}/{})",
                        e, delay, retries, self.policy.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
