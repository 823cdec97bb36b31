pub mod aggregator;
pub mod fx_rate_cache;
pub mod trend_tracker;

pub use aggregator::{AggregatorSettings, QuoteAggregator};
pub use fx_rate_cache::{FxCacheEntry, FxRateCache};
pub use trend_tracker::TrendTracker;
