//! Quote venue configuration parsing from environment variables.
//!
//! - Binance (ticker venue, USD-denominated)
//! - Upbit (domestic venue, KRW-denominated)
//! - exchangerate-api (FX venue)

use super::{Lookup, parse_or};
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct VenueConfig {
    pub binance_base_url: String,
    pub binance_batch_requests: bool,
    pub upbit_base_url: String,
    pub fx_base_url: String,
    pub fx_quote_currency: String,
    pub http_timeout_secs: u64,
    pub http_max_retries: u32,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            binance_base_url: "https://api.binance.com".to_string(),
            binance_batch_requests: true,
            upbit_base_url: "https://api.upbit.com".to_string(),
            fx_base_url: "https://api.exchangerate-api.com".to_string(),
            fx_quote_currency: "KRW".to_string(),
            http_timeout_secs: 10,
            http_max_retries: 0,
        }
    }
}

impl VenueConfig {
    pub fn from_lookup(lookup: &Lookup) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            binance_base_url: lookup("BINANCE_BASE_URL").unwrap_or(defaults.binance_base_url),
            binance_batch_requests: parse_or(
                lookup,
                "BINANCE_BATCH_REQUESTS",
                defaults.binance_batch_requests,
            )?,
            upbit_base_url: lookup("UPBIT_BASE_URL").unwrap_or(defaults.upbit_base_url),
            fx_base_url: lookup("FX_BASE_URL").unwrap_or(defaults.fx_base_url),
            fx_quote_currency: lookup("FX_QUOTE_CURRENCY")
                .map(|c| c.trim().to_uppercase())
                .unwrap_or(defaults.fx_quote_currency),
            http_timeout_secs: parse_or(lookup, "HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            http_max_retries: parse_or(lookup, "HTTP_MAX_RETRIES", defaults.http_max_retries)?,
        })
    }
}
