// Display state machine and carousel
pub mod display;

// Quote aggregation, trend tracking and FX caching
pub mod market_data;

// Cycle driver
pub mod polling;

// Persisted user preferences
pub mod preferences;
