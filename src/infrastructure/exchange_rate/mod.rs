//! FX venue client for the USD/domestic rate (exchangerate-api, no key needed).

use crate::domain::errors::QuoteSourceError;
use crate::domain::ports::FxRateSource;
use crate::infrastructure::core::response::get_json;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    #[allow(dead_code)]
    base: String,
    rates: HashMap<String, f64>,
}

impl ExchangeRateResponse {
    fn rate_for(&self, currency: &str) -> Result<f64, QuoteSourceError> {
        self.rates
            .get(currency)
            .copied()
            .ok_or_else(|| QuoteSourceError::Decode(format!("no {} rate in response", currency)))
    }
}

pub struct ExchangeRateClient {
    client: ClientWithMiddleware,
    base_url: String,
    quote_currency: String,
}

impl ExchangeRateClient {
    pub fn new(
        client: ClientWithMiddleware,
        base_url: impl Into<String>,
        quote_currency: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            quote_currency: quote_currency.into(),
        }
    }
}

#[async_trait]
impl FxRateSource for ExchangeRateClient {
    async fn fetch_rate(&self) -> Result<f64, QuoteSourceError> {
        let url = format!("{}/v4/latest/USD", self.base_url);
        let response: ExchangeRateResponse = get_json(self.client.get(url)).await?;
        let rate = response.rate_for(&self.quote_currency)?;
        debug!("ExchangeRateClient: USD/{} = {}", self.quote_currency, rate);
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::core::response::decode_json;

    #[test]
    fn test_rate_lookup() {
        let body = r#"{"base":"USD","date":"2026-01-02","rates":{"USD":1,"KRW":1340.5}}"#;
        let response: ExchangeRateResponse = decode_json(body).unwrap();
        assert_eq!(response.rate_for("KRW").unwrap(), 1340.5);
        assert!(matches!(
            response.rate_for("JPY"),
            Err(QuoteSourceError::Decode(_))
        ));
    }
}
