use crate::domain::asset::Asset;
use crate::domain::quote::Trend;
use std::collections::HashMap;

/// Last observed price per asset. Never reset during the process lifetime.
#[derive(Debug, Default)]
pub struct TrendTracker {
    last_price: HashMap<Asset, f64>,
}

impl TrendTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies `price` against the last observation and records it.
    pub fn observe(&mut self, asset: Asset, price: f64) -> Trend {
        let trend = Trend::classify(self.last_price.get(&asset).copied(), price);
        self.last_price.insert(asset, price);
        trend
    }

    pub fn last_price(&self, asset: Asset) -> Option<f64> {
        self.last_price.get(&asset).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_sequence() {
        let mut tracker = TrendTracker::new();
        assert_eq!(tracker.observe(Asset::Btc, 100.0), Trend::Flat);
        assert_eq!(tracker.observe(Asset::Btc, 100.0), Trend::Flat);
        assert_eq!(tracker.observe(Asset::Btc, 101.0), Trend::Up);
        assert_eq!(tracker.observe(Asset::Btc, 90.0), Trend::Down);
        assert_eq!(tracker.last_price(Asset::Btc), Some(90.0));
    }

    #[test]
    fn test_assets_are_tracked_independently() {
        let mut tracker = TrendTracker::new();
        tracker.observe(Asset::Btc, 100.0);
        assert_eq!(tracker.observe(Asset::Eth, 50.0), Trend::Flat);
        assert_eq!(tracker.last_price(Asset::Sol), None);
    }
}
