// src/app.rs
use anyhow::Result;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::domain::price::{PriceFeed, PriceMonitor, PriceMonitorConfig};
use crate::infrastructure::{RetryPolicy, RetryingQuoteSource, TickerApiClient, DEFAULT_TICKER_ENDPOINT};
use crate::report::ConsoleReporter;
use crate::shared::errors::AppError;

/// Values given on the command line; `None` leaves the current setting alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub percent_threshold: Option<Decimal>,
    pub interval_secs: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub max_retries: Option<u32>,
    pub backoff_factor: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppCfg {
    pub endpoint: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub monitor: PriceMonitorConfig,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_TICKER_ENDPOINT.to_string(),
            poll_interval: Duration::from_millis(500),
            request_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            monitor: PriceMonitorConfig::default(),
        }
    }
}

impl AppCfg {
    /// Config file values over defaults.
    pub fn from_config(cfg: Config) -> Self {
        let defaults = Self::default();

        Self {
            endpoint: cfg.feed.endpoint.unwrap_or(defaults.endpoint),
            poll_interval: cfg.feed.poll_interval_ms.map(Duration::from_millis).unwrap_or(defaults.poll_interval),
            request_timeout: cfg.feed.request_timeout_ms.map(Duration::from_millis).unwrap_or(defaults.request_timeout),
            retry: RetryPolicy {
                max_retries: cfg.retry.max_retries.unwrap_or(defaults.retry.max_retries),
                backoff_factor: cfg.retry.backoff_factor.unwrap_or(defaults.retry.backoff_factor),
                max_backoff: cfg.retry.max_backoff_secs.map(Duration::from_secs).unwrap_or(defaults.retry.max_backoff),
            },
            monitor: PriceMonitorConfig {
                percent_threshold: cfg.monitor.percent_threshold.unwrap_or(defaults.monitor.percent_threshold),
                interval: cfg.monitor.interval_secs.map(Duration::from_secs).unwrap_or(defaults.monitor.interval),
            },
        }
    }

    /// CLI values over whatever is already set.
    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(threshold) = overrides.percent_threshold {
            self.monitor.percent_threshold = threshold;
        }
        if let Some(interval_secs) = overrides.interval_secs {
            self.monitor.interval = Duration::from_secs(interval_secs);
        }
        if let Some(poll_interval_ms) = overrides.poll_interval_ms {
            self.poll_interval = Duration::from_millis(poll_interval_ms);
        }
        if let Some(max_retries) = overrides.max_retries {
            self.retry.max_retries = max_retries;
        }
        if let Some(backoff_factor) = overrides.backoff_factor {
            self.retry.backoff_factor = backoff_factor;
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.monitor.percent_threshold < Decimal::ZERO {
            return Err(AppError::ConfigError(format!(
                "percent threshold must not be negative, got {}",
                self.monitor.percent_threshold
            )));
        }
        if self.monitor.interval.is_zero() {
            return Err(AppError::ConfigError("interval must be greater than zero".to_string()));
        }
        if !self.retry.backoff_factor.is_finite() || self.retry.backoff_factor < 0.0 {
            return Err(AppError::ConfigError(format!(
                "backoff factor must be a non-negative number, got {}",
                self.retry.backoff_factor
            )));
        }
        if self.retry.max_backoff.is_zero() {
            return Err(AppError::ConfigError("max backoff must be greater than zero".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(AppError::ConfigError("request timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}

pub async fn run(app_cfg: AppCfg) -> Result<()> {
    app_cfg.validate()?;
    info!("Starting price monitor");
    info!("Configuration: {:?}", app_cfg);

    // The HTTP client lives inside the feed and is dropped when the loop exits
    let client = TickerApiClient::new(&app_cfg.endpoint, app_cfg.request_timeout)?;
    let source = RetryingQuoteSource::new(client, app_cfg.retry);
    let feed = PriceFeed::new(source, app_cfg.poll_interval);

    let mut monitor = PriceMonitor::new(app_cfg.monitor, ConsoleReporter::stdout());
    monitor.run(feed.into_stream()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::{QuoteSource, TickerQuote};
    use crate::shared::errors::{FeedError, MonitorError};
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let cfg = AppCfg::default();

        assert_eq!(cfg.endpoint, DEFAULT_TICKER_ENDPOINT);
        assert_eq!(cfg.poll_interval, Duration::from_millis(500));
        assert_eq!(cfg.monitor.percent_threshold, dec!(1.0));
        assert_eq!(cfg.monitor.interval, Duration::from_secs(3600));
        assert_eq!(cfg.retry.max_retries, 5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_from_config_overrides_defaults() {
        let cfg = Config::from_toml("[monitor]\npercent_threshold = 0.01\ninterval_secs = 5\n[retry]\nmax_retries = 2\n").unwrap();

        let app_cfg = AppCfg::from_config(cfg);

        assert_eq!(app_cfg.monitor.percent_threshold, dec!(0.01));
        assert_eq!(app_cfg.monitor.interval, Duration::from_secs(5));
        assert_eq!(app_cfg.retry.max_retries, 2);
        assert_eq!(app_cfg.retry.backoff_factor, 0.3);
        assert_eq!(app_cfg.endpoint, DEFAULT_TICKER_ENDPOINT);
    }

    #[test]
    fn test_cli_overrides_win_over_config_file() {
        let cfg = Config::from_toml(
            "[feed]\npoll_interval_ms = 1000\n[monitor]\npercent_threshold = 0.01\ninterval_secs = 5\n[retry]\nmax_retries = 2\n",
        )
        .unwrap();
        let mut app_cfg = AppCfg::from_config(cfg);

        app_cfg.apply_overrides(CliOverrides {
            percent_threshold: Some(dec!(2.5)),
            max_retries: Some(7),
            ..CliOverrides::default()
        });

        // overridden on the command line
        assert_eq!(app_cfg.monitor.percent_threshold, dec!(2.5));
        assert_eq!(app_cfg.retry.max_retries, 7);
        // from the file
        assert_eq!(app_cfg.monitor.interval, Duration::from_secs(5));
        assert_eq!(app_cfg.poll_interval, Duration::from_millis(1000));
        // defaults
        assert_eq!(app_cfg.endpoint, DEFAULT_TICKER_ENDPOINT);
        assert_eq!(app_cfg.retry.backoff_factor, 0.3);
        assert_eq!(app_cfg.retry.max_backoff, Duration::from_secs(120));
    }

    #[test]
    fn test_empty_overrides_change_nothing() {
        let mut app_cfg = AppCfg::default();

        app_cfg.apply_overrides(CliOverrides::default());

        assert_eq!(app_cfg, AppCfg::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = AppCfg::default();
        cfg.monitor.percent_threshold = dec!(-1);
        assert!(matches!(cfg.validate(), Err(AppError::ConfigError(_))));

        let mut cfg = AppCfg::default();
        cfg.monitor.interval = Duration::ZERO;
        assert!(cfg.validate().is_err());

        let mut cfg = AppCfg::default();
        cfg.retry.backoff_factor = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = AppCfg::default();
        cfg.retry.max_backoff = Duration::ZERO;
        assert!(cfg.validate().is_err());
    }

    struct UnreachableSource;

    #[async_trait::async_trait]
    impl QuoteSource for UnreachableSource {
        async fn fetch_quote(&self) -> Result<TickerQuote, FeedError> {
            Err(FeedError::Transport("connection refused".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_stop_the_monitor_without_output() {
        let source = RetryingQuoteSource::new(UnreachableSource, RetryPolicy { max_retries: 3, backoff_factor: 0.3, ..RetryPolicy::default() });
        let feed = PriceFeed::new(source, Duration::from_millis(500));
        let mut monitor = PriceMonitor::new(PriceMonitorConfig::default(), ConsoleReporter::new(Vec::new()));

        let result = monitor.run(feed.into_stream()).await;

        assert!(matches!(result, Err(MonitorError::Feed(FeedError::Network { attempts: 4, .. }))));
        assert_eq!(monitor.stats().observations, 0);
        assert!(monitor.sink().get_ref().is_empty());
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_endpoint() {
        let cfg = AppCfg {
            endpoint: "ticker".to_string(),
            ..AppCfg::default()
        };

        assert!(run(cfg).await.is_err());
    }
}
