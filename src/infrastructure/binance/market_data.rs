//! Binance ticker venue client
//!
//! Fetches last-trade prices from `/api/v3/ticker/price`, either with one
//! batched multi-symbol request or with one request per symbol issued
//! concurrently.

use crate::domain::errors::QuoteSourceError;
use crate::domain::ports::{PriceBatch, TickerPriceSource};
use crate::infrastructure::core::response::{get_json, parse_price};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct PriceTicker {
    symbol: String,
    price: String,
}

pub struct BinanceTickerClient {
    client: ClientWithMiddleware,
    base_url: String,
    batch_requests: bool,
}

impl BinanceTickerClient {
    pub fn new(client: ClientWithMiddleware, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            batch_requests: true,
        }
    }

    /// Switch between one multi-symbol request and one request per symbol.
    pub fn with_batch_requests(mut self, batch_requests: bool) -> Self {
        self.batch_requests = batch_requests;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/api/v3/ticker/price", self.base_url)
    }

    fn price_request(&self, symbol: &str) -> RequestBuilder {
        self.client
            .get(self.endpoint())
            .query(&[("symbol", symbol)])
    }

    fn prices_request(&self, symbols: &[String]) -> Result<RequestBuilder, QuoteSourceError> {
        // Binance accepts ["BTCUSDT","ETHUSDT"] in a single call
        let symbols_json =
            serde_json::to_string(symbols).map_err(|e| QuoteSourceError::Decode(e.to_string()))?;
        Ok(self
            .client
            .get(self.endpoint())
            .query(&[("symbols", symbols_json)]))
    }

    pub async fn fetch_price(&self, symbol: &str) -> Result<f64, QuoteSourceError> {
        let ticker: PriceTicker = get_json(self.price_request(symbol)).await?;
        parse_price(&ticker.symbol, &ticker.price)
    }

    async fn fetch_batched(&self, symbols: &[String]) -> Result<PriceBatch, QuoteSourceError> {
        let tickers: Vec<PriceTicker> = get_json(self.prices_request(symbols)?).await?;

        let mut prices = HashMap::with_capacity(tickers.len());
        for t in tickers {
            let price = parse_price(&t.symbol, &t.price)?;
            prices.insert(t.symbol, price);
        }
        Ok(PriceBatch::from_prices(prices))
    }

    async fn fetch_each(&self, symbols: &[String]) -> Result<PriceBatch, QuoteSourceError> {
        let results = join_all(symbols.iter().map(|symbol| async move {
            (symbol.clone(), self.fetch_price(symbol).await)
        }))
        .await;

        let mut batch = PriceBatch::default();
        for (symbol, result) in results {
            match result {
                Ok(price) => {
                    batch.prices.insert(symbol, price);
                }
                Err(e) => {
                    warn!("BinanceTickerClient: {} request failed: {}", symbol, e);
                    batch.failures.insert(symbol, e);
                }
            }
        }

        // Partial success is fine here; the aggregator decides what it needs.
        if batch.prices.is_empty() {
            if let Some(first) = symbols.iter().find_map(|s| batch.failures.remove(s)) {
                return Err(first);
            }
        }
        Ok(batch)
    }
}

#[async_trait]
impl TickerPriceSource for BinanceTickerClient {
    async fn fetch_prices(&self, symbols: &[String]) -> Result<PriceBatch, QuoteSourceError> {
        if symbols.is_empty() {
            return Ok(PriceBatch::default());
        }

        debug!(
            "BinanceTickerClient: Fetching {} symbols (batched={})",
            symbols.len(),
            self.batch_requests
        );

        if self.batch_requests {
            self.fetch_batched(symbols).await
        } else {
            self.fetch_each(symbols).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::core::HttpClientFactory;
    use crate::infrastructure::core::stub_server;
    use std::time::Duration;

    fn client(base_url: &str) -> BinanceTickerClient {
        BinanceTickerClient::new(
            HttpClientFactory::create_client(Duration::from_secs(2), 0),
            base_url,
        )
    }

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = client("https://api.binance.com/");
        assert_eq!(
            client.endpoint(),
            "https://api.binance.com/api/v3/ticker/price"
        );
    }

    #[test]
    fn test_batched_request_encodes_symbol_list() {
        let request = client("https://api.binance.com")
            .prices_request(&symbols(&["BTCUSDT", "ETHUSDT"]))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://api.binance.com/api/v3/ticker/price?symbols=%5B%22BTCUSDT%22%2C%22ETHUSDT%22%5D"
        );
    }

    #[tokio::test]
    async fn test_empty_symbol_list_makes_no_request() {
        // Unroutable base URL: any request would fail
        let batch = client("http://127.0.0.1:9").fetch_prices(&[]).await.unwrap();
        assert!(batch.prices.is_empty());
        assert!(batch.failures.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_venue_is_transport_failure() {
        let client = BinanceTickerClient::new(
            HttpClientFactory::create_client(Duration::from_millis(200), 0),
            "http://127.0.0.1:9",
        )
        .with_batch_requests(false);
        let err = client
            .fetch_prices(&symbols(&["BTCUSDT", "ETHUSDT"]))
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteSourceError::Transport(_)));
    }

    #[tokio::test]
    async fn test_batched_fetch_decodes_prices() {
        let base = stub_server::serve(|_| {
            (
                200,
                r#"[{"symbol":"BTCUSDT","price":"65000.50"},{"symbol":"ETHUSDT","price":"3200.00"}]"#
                    .to_string(),
            )
        })
        .await;

        let batch = client(&base)
            .fetch_prices(&symbols(&["BTCUSDT", "ETHUSDT"]))
            .await
            .unwrap();
        assert_eq!(batch.prices.get("BTCUSDT"), Some(&65000.5));
        assert_eq!(batch.prices.get("ETHUSDT"), Some(&3200.0));
        assert!(batch.failures.is_empty());
    }

    #[tokio::test]
    async fn test_per_symbol_fetch_keeps_partial_results() {
        let base = stub_server::serve(|target| {
            if target.contains("symbol=BTCUSDT") {
                (200, r#"{"symbol":"BTCUSDT","price":"65000.50"}"#.to_string())
            } else {
                (400, r#"{"code":-1121,"msg":"Invalid symbol."}"#.to_string())
            }
        })
        .await;

        let batch = client(&base)
            .with_batch_requests(false)
            .fetch_prices(&symbols(&["BTCUSDT", "NOPEUSDT"]))
            .await
            .unwrap();

        assert_eq!(batch.prices.len(), 1);
        assert_eq!(batch.prices.get("BTCUSDT"), Some(&65000.5));
        assert!(matches!(
            batch.failures.get("NOPEUSDT"),
            Some(QuoteSourceError::Protocol { status: 400, .. })
        ));
    }

    #[tokio::test]
    async fn test_batched_error_status_is_protocol_failure() {
        let base = stub_server::serve(|_| (418, "teapot".to_string())).await;

        let err = client(&base)
            .fetch_prices(&symbols(&["BTCUSDT"]))
            .await
            .unwrap_err();
        match err {
            QuoteSourceError::Protocol { status, body } => {
                assert_eq!(status, 418);
                assert_eq!(body, "teapot");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
