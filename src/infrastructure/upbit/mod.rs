//! Upbit domestic venue client (KRW markets).

use crate::domain::errors::QuoteSourceError;
use crate::domain::ports::DomesticPriceSource;
use crate::infrastructure::core::response::get_json;
use async_trait::async_trait;
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Ticker {
    market: String,
    trade_price: f64,
}

pub struct UpbitTickerClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl UpbitTickerClient {
    pub fn new(client: ClientWithMiddleware, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn ticker_request(&self, markets: &[String]) -> RequestBuilder {
        self.client
            .get(format!("{}/v1/ticker", self.base_url))
            .query(&[("markets", markets.join(","))])
    }
}

#[async_trait]
impl DomesticPriceSource for UpbitTickerClient {
    async fn fetch_prices(
        &self,
        markets: &[String],
    ) -> Result<HashMap<String, f64>, QuoteSourceError> {
        if markets.is_empty() {
            return Ok(HashMap::new());
        }

        debug!("UpbitTickerClient: Fetching markets {:?}", markets);
        let tickers: Vec<Ticker> = get_json(self.ticker_request(markets)).await?;

        Ok(tickers
            .into_iter()
            .map(|t| (t.market, t.trade_price))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::core::HttpClientFactory;
    use crate::infrastructure::core::response::decode_json;
    use crate::infrastructure::core::stub_server;
    use std::time::Duration;

    #[test]
    fn test_ticker_request_joins_markets() {
        let client = UpbitTickerClient::new(
            HttpClientFactory::create_client(Duration::from_secs(1), 0),
            "https://api.upbit.com",
        );
        let request = client
            .ticker_request(&["KRW-USDT".to_string(), "KRW-USDC".to_string()])
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://api.upbit.com/v1/ticker?markets=KRW-USDT%2CKRW-USDC"
        );
    }

    #[test]
    fn test_ticker_payload_shape() {
        let body = r#"[{"market":"KRW-USDT","trade_price":1352.0,"signed_change_rate":0.001}]"#;
        let tickers: Vec<Ticker> = decode_json(body).unwrap();
        assert_eq!(tickers[0].market, "KRW-USDT");
        assert_eq!(tickers[0].trade_price, 1352.0);

        assert!(decode_json::<Vec<Ticker>>(r#"[{"market":"KRW-USDT"}]"#).is_err());
    }

    #[tokio::test]
    async fn test_fetch_decodes_markets() {
        let base = stub_server::serve(|target| {
            assert!(target.starts_with("/v1/ticker?markets="));
            (
                200,
                r#"[{"market":"KRW-USDT","trade_price":1350.0},{"market":"KRW-USDC","trade_price":1347.0}]"#
                    .to_string(),
            )
        })
        .await;
        let client = UpbitTickerClient::new(
            HttpClientFactory::create_client(Duration::from_secs(2), 0),
            base,
        );

        let prices = client
            .fetch_prices(&["KRW-USDT".to_string(), "KRW-USDC".to_string()])
            .await
            .unwrap();
        assert_eq!(prices.get("KRW-USDT"), Some(&1350.0));
        assert_eq!(prices.get("KRW-USDC"), Some(&1347.0));
    }

    #[tokio::test]
    async fn test_unavailable_venue_is_protocol_failure() {
        let base = stub_server::serve(|_| (503, "down".to_string())).await;
        let client = UpbitTickerClient::new(
            HttpClientFactory::create_client(Duration::from_secs(2), 0),
            base,
        );

        let err = client
            .fetch_prices(&["KRW-USDT".to_string()])
            .await
            .unwrap_err();
        match err {
            QuoteSourceError::Protocol { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_decode_failure() {
        let base = stub_server::serve(|_| (200, r#"{"error":"moved"}"#.to_string())).await;
        let client = UpbitTickerClient::new(
            HttpClientFactory::create_client(Duration::from_secs(2), 0),
            base,
        );

        let err = client
            .fetch_prices(&["KRW-USDT".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteSourceError::Decode(_)));
    }
}
