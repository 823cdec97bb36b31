#![allow(dead_code)]

use async_trait::async_trait;
use coinbar::domain::errors::QuoteSourceError;
use coinbar::domain::ports::{
    DomesticPriceSource, FxRateSource, PriceBatch, QuoteSubscriber, TickerPriceSource,
};
use coinbar::domain::quote::Quote;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted price venue usable as either the ticker or the domestic source.
#[derive(Default)]
pub struct MockPriceVenue {
    prices: Mutex<HashMap<String, f64>>,
    failing: AtomicBool,
    failing_symbols: Mutex<HashSet<String>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
}

impl MockPriceVenue {
    pub fn with_prices(prices: &[(&str, f64)]) -> Self {
        let venue = Self::default();
        for (symbol, price) in prices {
            venue.set_price(symbol, *price);
        }
        venue
    }

    pub fn set_price(&self, symbol: &str, price: f64) {
        self.prices.lock().unwrap().insert(symbol.to_string(), price);
    }

    pub fn remove_price(&self, symbol: &str) {
        self.prices.lock().unwrap().remove(symbol);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fails only the request for `symbol`, as the per-symbol ticker mode can.
    pub fn fail_symbol(&self, symbol: &str) {
        self.failing_symbols.lock().unwrap().insert(symbol.to_string());
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn respond(&self, keys: &[String]) -> Result<PriceBatch, QuoteSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(QuoteSourceError::Protocol {
                status: 503,
                body: "maintenance".to_string(),
            });
        }

        let prices = self.prices.lock().unwrap();
        let failing_symbols = self.failing_symbols.lock().unwrap();
        let mut batch = PriceBatch::default();
        for key in keys {
            if failing_symbols.contains(key) {
                batch.failures.insert(
                    key.clone(),
                    QuoteSourceError::Protocol {
                        status: 400,
                        body: format!("invalid symbol {}", key),
                    },
                );
            } else if let Some(price) = prices.get(key) {
                batch.prices.insert(key.clone(), *price);
            }
        }
        Ok(batch)
    }
}

#[async_trait]
impl TickerPriceSource for MockPriceVenue {
    async fn fetch_prices(&self, symbols: &[String]) -> Result<PriceBatch, QuoteSourceError> {
        self.respond(symbols).await
    }
}

#[async_trait]
impl DomesticPriceSource for MockPriceVenue {
    async fn fetch_prices(
        &self,
        markets: &[String],
    ) -> Result<HashMap<String, f64>, QuoteSourceError> {
        Ok(self.respond(markets).await?.prices)
    }
}

pub struct MockFx {
    rate: Mutex<f64>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockFx {
    pub fn new(rate: f64) -> Self {
        Self {
            rate: Mutex::new(rate),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FxRateSource for MockFx {
    async fn fetch_rate(&self) -> Result<f64, QuoteSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(QuoteSourceError::Transport("connection refused".to_string()));
        }
        Ok(*self.rate.lock().unwrap())
    }
}

/// Records every delivered quote set.
#[derive(Default)]
pub struct RecordingSubscriber {
    deliveries: Mutex<Vec<Vec<Quote>>>,
}

impl RecordingSubscriber {
    pub fn deliveries(&self) -> Vec<Vec<Quote>> {
        self.deliveries.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.deliveries.lock().unwrap().len()
    }
}

impl QuoteSubscriber for RecordingSubscriber {
    fn on_quotes(&self, quotes: &[Quote]) {
        self.deliveries.lock().unwrap().push(quotes.to_vec());
    }
}
