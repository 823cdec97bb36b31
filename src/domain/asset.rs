//! Supported assets and their venue mappings.
//!
//! The asset universe is closed and fixed at compile time. Every asset knows
//! how it is quoted on the ticker venue (Binance USDT market), on the domestic
//! venue (Upbit KRW market) and which currency its price is displayed in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quote currency of the ticker venue. Treated as 1:1 USD.
pub const TICKER_QUOTE_CURRENCY: &str = "USDT";

/// Quote currency of the domestic venue.
pub const DOMESTIC_QUOTE_CURRENCY: &str = "KRW";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Btc,
    Eth,
    Bnb,
    Sol,
    Xrp,
    Usdc,
    Usdt,
    Doge,
    Ada,
    Trx,
}

/// How a quote price is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyDisplay {
    Usd,
    Krw,
}

impl Asset {
    /// The full universe, in dropdown order.
    pub const ALL: [Asset; 10] = [
        Asset::Btc,
        Asset::Eth,
        Asset::Bnb,
        Asset::Sol,
        Asset::Xrp,
        Asset::Usdc,
        Asset::Usdt,
        Asset::Doge,
        Asset::Ada,
        Asset::Trx,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
            Asset::Bnb => "BNB",
            Asset::Sol => "SOL",
            Asset::Xrp => "XRP",
            Asset::Usdc => "USDC",
            Asset::Usdt => "USDT",
            Asset::Doge => "DOGE",
            Asset::Ada => "ADA",
            Asset::Trx => "TRX",
        }
    }

    /// Stable coins are priced on the domestic venue and carry a spread.
    pub fn is_stable_coin(&self) -> bool {
        matches!(self, Asset::Usdc | Asset::Usdt)
    }

    /// Stable coins whose USD value is cross-referenced on the ticker venue.
    ///
    /// USDT is the ticker venue's own quote currency, so it is assumed to be
    /// worth exactly one dollar.
    pub fn requires_usd_reference(&self) -> bool {
        matches!(self, Asset::Usdc)
    }

    /// Ticker-venue symbol, e.g. `BTCUSDT`. `None` for the quote currency itself.
    pub fn ticker_symbol(&self) -> Option<String> {
        if *self == Asset::Usdt {
            return None;
        }
        Some(format!("{}{}", self.code(), TICKER_QUOTE_CURRENCY))
    }

    /// Domestic-venue market, e.g. `KRW-USDT`.
    pub fn domestic_market(&self) -> String {
        format!("{}-{}", DOMESTIC_QUOTE_CURRENCY, self.code())
    }

    pub fn currency_display(&self) -> CurrencyDisplay {
        if self.is_stable_coin() {
            CurrencyDisplay::Krw
        } else {
            CurrencyDisplay::Usd
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Asset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Asset::ALL
            .iter()
            .copied()
            .find(|a| a.code() == wanted)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown asset: {}. Must be one of {}",
                    s,
                    Asset::ALL.map(|a| a.code()).join(", ")
                )
            })
    }
}

/// Parses a comma separated asset list such as `"btc, ETH,usdt"`.
pub fn parse_asset_list(raw: &str) -> anyhow::Result<Vec<Asset>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Asset::from_str)
        .collect()
}
