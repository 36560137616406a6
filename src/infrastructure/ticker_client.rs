use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

use crate::domain::price::{QuoteSource, TickerQuote};
use crate::shared::errors::{AppError, FeedError};

pub const DEFAULT_TICKER_ENDPOINT: &str = "https://fapi.binance.com/fapi/v1/ticker/24hr?symbol=ETHUSDT";

/// 24h ticker API client
pub struct TickerApiClient {
    http_client: Client,
    endpoint: Url,
}

impl TickerApiClient {
    pub fn new(endpoint: &str, request_timeout: Duration) -> Result<Self, AppError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| AppError::ConfigError(format!("Invalid ticker endpoint {}: {}", endpoint, e)))?;
        let http_client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(http_client, endpoint))
    }

    pub fn with_client(http_client: Client, endpoint: Url) -> Self {
        Self {
            http_client,
            endpoint,
        }
    }
}

/// Decode a ticker body. Anything that isn't an object with the three fields is a parse error.
pub fn parse_ticker(body: &str) -> Result<TickerQuote, FeedError> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl QuoteSource for TickerApiClient {
    async fn fetch_quote(&self) -> Result<TickerQuote, FeedError> {
        let response = self.http_client.get(self.endpoint.clone()).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Transport(format!(
                "ticker request failed with status: {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        debug!("Ticker response: {}", body);
        parse_ticker(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response on a local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{}/fapi/v1/ticker/24hr?symbol=ETHUSDT", addr)
    }

    fn local_client(url: &str) -> TickerApiClient {
        let http_client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        TickerApiClient::with_client(http_client, Url::parse(url).unwrap())
    }

    #[test]
    fn test_parse_ticker() {
        let quote = parse_ticker(r#"{"lastPrice":"2000.10","priceChange":"-3.2","priceChangePercent":"-0.16"}"#).unwrap();
        assert_eq!(quote.last_price, dec!(2000.10));

        assert!(matches!(parse_ticker(r#"{"lastPrice":"abc","priceChange":"1","priceChangePercent":"1"}"#), Err(FeedError::Parse(_))));
        assert!(matches!(parse_ticker("<html>busy</html>"), Err(FeedError::Parse(_))));
    }

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        assert!(matches!(TickerApiClient::new("not a url", Duration::from_secs(1)), Err(AppError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_fetch_quote_from_local_server() {
        let url = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"symbol":"ETHUSDT","lastPrice":"2021.00","priceChange":"21.00","priceChangePercent":"1.050"}"#,
        )
        .await;
        let client = local_client(&url);

        let quote = client.fetch_quote().await.unwrap();

        assert_eq!(quote.last_price, dec!(2021));
        assert_eq!(quote.price_change, dec!(21));
        assert_eq!(quote.price_change_percent, dec!(1.05));
    }

    #[tokio::test]
    async fn test_server_error_status_is_transport_error() {
        let url = serve_once("HTTP/1.1 503 Service Unavailable", r#"{"code":-1}"#).await;
        let client = local_client(&url);

        let result = client.fetch_quote().await;

        assert!(matches!(result, Err(FeedError::Transport(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = local_client(&format!("http://{}/ticker", addr));

        let result = client.fetch_quote().await;

        assert!(matches!(result, Err(FeedError::Transport(_))));
    }
}
