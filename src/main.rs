use anyhow::Result;
use clap::Parser;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use pricewatch::app::{self, AppCfg, CliOverrides};
use pricewatch::config::Config;

#[derive(Parser, Debug)]
#[command(version, about = "Watches a 24h ticker and alerts on percent moves over a rolling interval")]
struct Args {
    /// Path to config file (optional)
    #[arg(long)]
    config: Option<String>,

    /// Ticker endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Percent change that triggers a risen/fallen alert (1.0 = 1%)
    #[arg(long)]
    threshold: Option<Decimal>,

    /// Comparison interval in seconds
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Pause between polls in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Transport retries per poll
    #[arg(long)]
    retries: Option<u32>,

    /// Backoff factor in seconds
    #[arg(long)]
    backoff_factor: Option<f64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    // Priority: CLI args > Config file > Defaults
    let mut app_cfg = match &args.config {
        Some(config_path) => AppCfg::from_config(Config::from_file(config_path)?),
        None => AppCfg::default(),
    };
    app_cfg.apply_overrides(CliOverrides {
        endpoint: args.endpoint,
        percent_threshold: args.threshold,
        interval_secs: args.interval_secs,
        poll_interval_ms: args.poll_interval_ms,
        max_retries: args.retries,
        backoff_factor: args.backoff_factor,
    });

    app::run(app_cfg).await
}
