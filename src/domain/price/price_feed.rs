//! Price feed: turns a quote source into a paced observation stream

use futures::stream::{self, Stream};
use std::time::Duration;

use super::QuoteSource;
use crate::shared::errors::FeedError;
use crate::shared::types::Observation;

/// Polls a quote source with a fixed pause between requests
pub struct PriceFeed<S> {
    source: S,
    poll_interval: Duration,
}

impl<S: QuoteSource> PriceFeed<S> {
    pub fn new(source: S, poll_interval: Duration) -> Self {
        Self {
            source,
            poll_interval,
        }
    }

    /// One request, stamped with the current monotonic time.
    async fn poll(&self) -> Result<Observation, FeedError> {
        let quote = self.source.fetch_quote().await?;
        Ok(quote.into_observation(tokio::time::Instant::now().into_std()))
    }

    /// Infinite stream of observations. The first poll happens immediately, every
    /// later one after `poll_interval`. The stream yields the first error it hits
    /// and then ends for good.
    pub fn into_stream(self) -> impl Stream<Item = Result<Observation, FeedError>> {
        stream::try_unfold((self, true), |(feed, first)| async move {
            if !first {
                tokio::time::sleep(feed.poll_interval).await;
            }
            let observation = feed.poll().await?;
            Ok::<_, FeedError>(Some((observation, (feed, false))))
        })
    }
}
