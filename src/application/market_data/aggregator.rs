//! Quote Aggregator
//!
//! Runs one all-or-nothing aggregation cycle across the ticker venue, the
//! domestic venue and the FX cache:
//! - ticker and domestic requests (plus the FX lookup) are issued concurrently
//! - any failed request or missing symbol fails the whole cycle
//! - trends are only recorded once every input of the cycle is present
//! - the result is ordered by the configured display priority

use crate::application::market_data::fx_rate_cache::FxRateCache;
use crate::application::market_data::trend_tracker::TrendTracker;
use crate::domain::asset::Asset;
use crate::domain::errors::{CycleError, Venue};
use crate::domain::ports::{DomesticPriceSource, FxRateSource, PriceBatch, TickerPriceSource};
use crate::domain::quote::{Quote, spread_percent};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Max age of the cached FX rate when not configured otherwise.
pub const DEFAULT_FX_MAX_AGE: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone)]
pub struct AggregatorSettings {
    pub assets: Vec<Asset>,
    pub display_priority: Vec<Asset>,
    pub fx_max_age: Duration,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            assets: Asset::ALL.to_vec(),
            display_priority: vec![Asset::Btc, Asset::Eth, Asset::Usdt, Asset::Usdc],
            fx_max_age: DEFAULT_FX_MAX_AGE,
        }
    }
}

/// Requests needed for one cycle.
#[derive(Debug, Default, PartialEq)]
struct CyclePlan {
    ticker_symbols: Vec<String>,
    domestic_markets: Vec<String>,
}

impl CyclePlan {
    fn for_assets(assets: &[Asset]) -> Self {
        let mut plan = CyclePlan::default();
        for asset in assets {
            if asset.is_stable_coin() {
                plan.domestic_markets.push(asset.domestic_market());
                if asset.requires_usd_reference() {
                    plan.ticker_symbols.extend(asset.ticker_symbol());
                }
            } else {
                plan.ticker_symbols.extend(asset.ticker_symbol());
            }
        }
        plan
    }

    fn needs_fx(&self) -> bool {
        !self.domestic_markets.is_empty()
    }
}

pub struct QuoteAggregator {
    ticker: Arc<dyn TickerPriceSource>,
    domestic: Arc<dyn DomesticPriceSource>,
    fx_cache: FxRateCache,
    trends: TrendTracker,
    assets: Vec<Asset>,
    display_priority: Vec<Asset>,
    fx_max_age: Duration,
}

impl QuoteAggregator {
    pub fn new(
        ticker: Arc<dyn TickerPriceSource>,
        domestic: Arc<dyn DomesticPriceSource>,
        fx: Arc<dyn FxRateSource>,
        settings: AggregatorSettings,
    ) -> Self {
        let mut assets: Vec<Asset> = Vec::with_capacity(settings.assets.len());
        for asset in settings.assets {
            if !assets.contains(&asset) {
                assets.push(asset);
            }
        }

        Self {
            ticker,
            domestic,
            fx_cache: FxRateCache::new(fx),
            trends: TrendTracker::new(),
            assets,
            display_priority: settings.display_priority,
            fx_max_age: settings.fx_max_age,
        }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn trends(&self) -> &TrendTracker {
        &self.trends
    }

    pub fn fx_cache(&self) -> &FxRateCache {
        &self.fx_cache
    }

    /// Runs one cycle. Either every configured asset gets a fresh quote or
    /// nothing is produced and no state changes except a refreshed FX entry.
    pub async fn fetch_all(&mut self) -> Result<Vec<Quote>, CycleError> {
        let plan = CyclePlan::for_assets(&self.assets);
        let ticker = Arc::clone(&self.ticker);
        let domestic = Arc::clone(&self.domestic);
        let fx_cache = &mut self.fx_cache;
        let fx_max_age = self.fx_max_age;

        let (mut ticker_prices, domestic_prices, fx_rate) = tokio::try_join!(
            async {
                if plan.ticker_symbols.is_empty() {
                    return Ok(PriceBatch::default());
                }
                ticker
                    .fetch_prices(&plan.ticker_symbols)
                    .await
                    .map_err(CycleError::at(Venue::Ticker))
            },
            async {
                if plan.domestic_markets.is_empty() {
                    return Ok(HashMap::new());
                }
                domestic
                    .fetch_prices(&plan.domestic_markets)
                    .await
                    .map_err(CycleError::at(Venue::Domestic))
            },
            async {
                if !plan.needs_fx() {
                    return Ok(None);
                }
                fx_cache
                    .get_rate(fx_max_age)
                    .await
                    .map(Some)
                    .map_err(CycleError::at(Venue::Fx))
            },
        )?;

        // Resolve every input before touching trend state
        let mut priced: Vec<(Asset, f64, Option<f64>)> = Vec::with_capacity(self.assets.len());
        for &asset in &self.assets {
            if asset.is_stable_coin() {
                let market = asset.domestic_market();
                let domestic_price = lookup(&domestic_prices, &market, Venue::Domestic)?;
                let usd_price = match asset.ticker_symbol() {
                    Some(symbol) if asset.requires_usd_reference() => {
                        take_ticker_price(&mut ticker_prices, &symbol)?
                    }
                    _ => 1.0,
                };
                let rate = fx_rate.ok_or_else(|| CycleError::MissingQuote {
                    venue: Venue::Fx,
                    symbol: "USD rate".to_string(),
                })?;
                let spread = spread_percent(domestic_price, usd_price, rate);
                debug!(
                    "QuoteAggregator: {} domestic={} usd={} fx={} spread={:.3}%",
                    asset, domestic_price, usd_price, rate, spread
                );
                priced.push((asset, domestic_price, Some(spread)));
            } else {
                let symbol = asset.ticker_symbol().ok_or_else(|| CycleError::MissingQuote {
                    venue: Venue::Ticker,
                    symbol: asset.code().to_string(),
                })?;
                let price = take_ticker_price(&mut ticker_prices, &symbol)?;
                priced.push((asset, price, None));
            }
        }

        let mut quotes: Vec<Quote> = priced
            .into_iter()
            .map(|(asset, price, spread_percent)| Quote {
                asset,
                price,
                trend: self.trends.observe(asset, price),
                spread_percent,
            })
            .collect();

        self.sort_by_priority(&mut quotes);
        info!("QuoteAggregator: Cycle produced {} quotes", quotes.len());
        Ok(quotes)
    }

    fn sort_by_priority(&self, quotes: &mut [Quote]) {
        // Stable: unprioritised assets keep their configured order at the end
        quotes.sort_by_key(|q| {
            self.display_priority
                .iter()
                .position(|a| *a == q.asset)
                .unwrap_or(usize::MAX)
        });
    }
}

/// A symbol whose own request failed reports that failure, not a gap.
fn take_ticker_price(batch: &mut PriceBatch, symbol: &str) -> Result<f64, CycleError> {
    if let Some(price) = batch.prices.get(symbol) {
        return Ok(*price);
    }
    match batch.failures.remove(symbol) {
        Some(source) => Err(CycleError::Source {
            venue: Venue::Ticker,
            source,
        }),
        None => Err(CycleError::MissingQuote {
            venue: Venue::Ticker,
            symbol: symbol.to_string(),
        }),
    }
}

fn lookup(prices: &HashMap<String, f64>, key: &str, venue: Venue) -> Result<f64, CycleError> {
    prices
        .get(key)
        .copied()
        .ok_or_else(|| CycleError::MissingQuote {
            venue,
            symbol: key.to_string(),
        })
}
