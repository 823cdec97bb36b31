//! Terminal stand-in for the menu-bar title.
//!
//! Formats a selection as one line, e.g.
//! `$97,123.45 ↗︎   $3,512.10 –   ₩1350 (+0.75%) ↘︎`.

use crate::domain::asset::CurrencyDisplay;
use crate::domain::ports::{QuoteRenderer, Selection};
use crate::domain::quote::{Quote, format_spread_percent};
use std::io::Write;
use std::sync::Mutex;
use tracing::warn;

const LOADING_PLACEHOLDER: &str = "BTC ... | ETH ... | USDT ...";
const SEPARATOR: &str = "   ";

/// `$` with thousands separators and two decimals.
pub fn format_usd(price: f64) -> String {
    let formatted = format!("{:.2}", price.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if price < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac_part)
}

/// `₩` with no decimals.
pub fn format_krw(price: f64) -> String {
    format!("₩{:.0}", price)
}

pub fn format_quote(quote: &Quote) -> String {
    let mut text = match quote.asset.currency_display() {
        CurrencyDisplay::Usd => format_usd(quote.price),
        CurrencyDisplay::Krw => format_krw(quote.price),
    };
    if let Some(spread) = quote.spread_percent {
        text.push_str(&format!(" ({})", format_spread_percent(spread)));
    }
    text.push(' ');
    text.push_str(quote.trend.symbol());
    text
}

pub fn format_selection(selection: &Selection) -> String {
    match selection {
        Selection::Loading => LOADING_PLACEHOLDER.to_string(),
        Selection::Quotes(quotes) => quotes
            .iter()
            .map(|q| format!("{} {}", q.asset, format_quote(q)))
            .collect::<Vec<_>>()
            .join(SEPARATOR),
    }
}

/// Writes each rendered line to a sink (stdout by default).
pub struct StatusLineRenderer {
    out: Mutex<Box<dyn Write + Send>>,
}

impl StatusLineRenderer {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl QuoteRenderer for StatusLineRenderer {
    fn render(&self, selection: &Selection) {
        let line = format_selection(selection);
        let mut out = self.out.lock().unwrap_or_else(|p| p.into_inner());
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            warn!("StatusLineRenderer: Failed to write status line: {}", e);
        }
    }
}
