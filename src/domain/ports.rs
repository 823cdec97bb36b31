use crate::domain::errors::QuoteSourceError;
use crate::domain::quote::Quote;
use async_trait::async_trait;
use std::collections::HashMap;

/// Outcome of one ticker-venue round.
///
/// Symbols whose own request failed are reported in `failures` rather than
/// silently left out of `prices`.
#[derive(Debug, Default)]
pub struct PriceBatch {
    pub prices: HashMap<String, f64>,
    pub failures: HashMap<String, QuoteSourceError>,
}

impl PriceBatch {
    pub fn from_prices(prices: HashMap<String, f64>) -> Self {
        Self {
            prices,
            failures: HashMap::new(),
        }
    }
}

/// USD-denominated prices keyed by ticker-venue symbol (e.g. `BTCUSDT`).
///
/// `Err` means the venue produced nothing at all.
#[async_trait]
pub trait TickerPriceSource: Send + Sync {
    async fn fetch_prices(&self, symbols: &[String]) -> Result<PriceBatch, QuoteSourceError>;
}

/// Domestic-currency prices keyed by market (e.g. `KRW-USDT`).
#[async_trait]
pub trait DomesticPriceSource: Send + Sync {
    async fn fetch_prices(
        &self,
        markets: &[String],
    ) -> Result<HashMap<String, f64>, QuoteSourceError>;
}

/// Domestic units per one USD.
#[async_trait]
pub trait FxRateSource: Send + Sync {
    async fn fetch_rate(&self) -> Result<f64, QuoteSourceError>;
}

/// Generic persisted key-value settings.
///
/// `get` returns `Ok(None)` for an absent key; callers apply their own default.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<serde_json::Value>>;
    fn set(&self, key: &str, value: serde_json::Value) -> anyhow::Result<()>;
}

/// What the rendering layer is asked to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// No quote for the current selection has arrived yet.
    Loading,
    Quotes(Vec<Quote>),
}

pub trait QuoteRenderer: Send + Sync {
    fn render(&self, selection: &Selection);
}

/// Receives the quote set of every successful polling cycle.
pub trait QuoteSubscriber: Send + Sync {
    fn on_quotes(&self, quotes: &[Quote]);
}

impl<F> QuoteSubscriber for F
where
    F: Fn(&[Quote]) + Send + Sync,
{
    fn on_quotes(&self, quotes: &[Quote]) {
        self(quotes)
    }
}
