//! Price monitoring: rolling reference window and interval alerts

use futures::{pin_mut, Stream, TryStreamExt};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::{AlertSink, PriceAnalyzer};
use crate::shared::errors::{FeedError, MonitorError};
use crate::shared::types::{Alert, AlertKind, Observation};

/// Price monitoring configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMonitorConfig {
    /// Percent, so `1.0` means 1%.
    pub percent_threshold: Decimal,
    pub interval: Duration,
}

impl Default for PriceMonitorConfig {
    fn default() -> Self {
        Self {
            percent_threshold: Decimal::ONE,
            interval: Duration::from_secs(60 * 60),
        }
    }
}

/// Monitoring statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub observations: u64,
    pub comparisons: u64,
    pub risen: u64,
    pub fallen: u64,
    pub neutral: u64,
    /// Boundaries skipped because the change was undefined (zero reference or overflow).
    pub skipped: u64,
}

impl MonitorStats {
    fn record(&mut self, kind: AlertKind) {
        self.comparisons += 1;
        match kind {
            AlertKind::Risen => self.risen += 1,
            AlertKind::Fallen => self.fallen += 1,
            AlertKind::Neutral => self.neutral += 1,
        }
    }
}

/// Tracks the change in price against a reference observation that is reset at
/// every interval boundary.
pub struct PriceMonitor<K> {
    config: PriceMonitorConfig,
    analyzer: PriceAnalyzer,
    reference: Option<Observation>,
    sink: K,
    stats: MonitorStats,
}

impl<K: AlertSink> PriceMonitor<K> {
    pub fn new(config: PriceMonitorConfig, sink: K) -> Self {
        Self {
            analyzer: PriceAnalyzer::new(config.percent_threshold),
            config,
            reference: None,
            sink,
            stats: MonitorStats::default(),
        }
    }

    pub fn reference(&self) -> Option<&Observation> {
        self.reference.as_ref()
    }

    pub fn stats(&self) -> &MonitorStats {
        &self.stats
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Process one observation. Returns the alert emitted at an interval
    /// boundary, if any.
    pub fn observe(&mut self, observation: Observation) -> Result<Option<Alert>, MonitorError> {
        self.stats.observations += 1;
        self.sink.status(&observation)?;

        let Some(reference) = &self.reference else {
            debug!("Reference set at price {}", observation.price);
            self.reference = Some(observation);
            return Ok(None);
        };

        let elapsed = observation.timestamp.saturating_duration_since(reference.timestamp);
        if elapsed < self.config.interval {
            return Ok(None);
        }

        let Some(alert) = self.analyzer.compare(reference, &observation) else {
            self.stats.skipped += 1;
            if observation.price.is_zero() {
                warn!("Reference price is zero, skipping comparison and keeping reference");
            } else {
                warn!(
                    "Percent change from {} to {} is undefined, skipping comparison and resetting reference",
                    reference.price, observation.price
                );
                self.reference = Some(observation);
            }
            return Ok(None);
        };

        debug!(
            "Interval elapsed ({:?}): {} -> {} = {}% ({})",
            elapsed, reference.price, observation.price, alert.change_percent, alert.kind
        );
        self.stats.record(alert.kind);
        self.sink.alert(&alert)?;
        self.reference = Some(observation);

        Ok(Some(alert))
    }

    /// Consume the feed until it fails (or, for finite feeds, ends).
    pub async fn run<S>(&mut self, feed: S) -> Result<MonitorStats, MonitorError>
    where
        S: Stream<Item = Result<Observation, FeedError>>,
    {
        info!(
            "🚀 Monitoring started: threshold {}%, interval {:?}",
            self.config.percent_threshold, self.config.interval
        );
        pin_mut!(feed);

        loop {
            match feed.try_next().await {
                Ok(Some(observation)) => {
                    self.observe(observation)?;
                }
                Ok(None) => break,
                Err(e) => {
                    error!("❌ Price feed failed: {}", e);
                    info!("Monitor stats: {:?}", self.stats);
                    return Err(e.into());
                }
            }
        }

        info!("Monitor stats: {:?}", self.stats);
        Ok(self.stats.clone())
    }
}
