use crate::domain::errors::QuoteSourceError;
use reqwest_middleware::RequestBuilder;
use serde::de::DeserializeOwned;

/// Sends a prepared request and decodes a JSON body, mapping every failure
/// onto the transport / protocol / decode taxonomy.
pub async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, QuoteSourceError> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(QuoteSourceError::Protocol {
            status: status.as_u16(),
            body,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| QuoteSourceError::Transport(e.to_string()))?;
    decode_json(&body)
}

pub fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, QuoteSourceError> {
    serde_json::from_str(body).map_err(|e| QuoteSourceError::Decode(e.to_string()))
}

/// Parses a decimal string price as sent by the ticker venue.
pub fn parse_price(symbol: &str, raw: &str) -> Result<f64, QuoteSourceError> {
    match raw.parse::<f64>() {
        Ok(p) if p.is_finite() => Ok(p),
        _ => Err(QuoteSourceError::Decode(format!(
            "invalid price {:?} for {}",
            raw, symbol
        ))),
    }
}
