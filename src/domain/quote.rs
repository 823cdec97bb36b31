use crate::domain::asset::Asset;
use serde::Serialize;

/// Short-term movement relative to the previous cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    /// Classifies `current` against the previously observed price.
    /// A first observation is always flat.
    pub fn classify(previous: Option<f64>, current: f64) -> Self {
        match previous {
            Some(prev) if current > prev => Trend::Up,
            Some(prev) if current < prev => Trend::Down,
            _ => Trend::Flat,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Trend::Up => "↗︎",
            Trend::Down => "↘︎",
            Trend::Flat => "–",
        }
    }
}

/// One asset's price for one polling cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub asset: Asset,
    pub price: f64,
    pub trend: Trend,
    /// Domestic vs. FX-implied price deviation, stable coins only.
    pub spread_percent: Option<f64>,
}

/// Percentage deviation of a domestic stable-coin price from its FX-implied price.
///
/// `theoretical = usd_price * fx_rate`. A non-positive or non-finite theoretical
/// price yields `0.0` instead of an infinity or NaN.
pub fn spread_percent(domestic_price: f64, usd_price: f64, fx_rate: f64) -> f64 {
    let theoretical = usd_price * fx_rate;
    if !theoretical.is_finite() || theoretical <= 0.0 {
        return 0.0;
    }
    (domestic_price - theoretical) / theoretical * 100.0
}

/// Signed, two-decimal percentage such as `+0.75%`.
pub fn format_spread_percent(value: f64) -> String {
    format!("{:+.2}%", value)
}
