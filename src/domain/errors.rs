use crate::domain::asset::Asset;
use thiserror::Error;

/// Failures raised by a single quote source request.
#[derive(Debug, Error)]
pub enum QuoteSourceError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status {status}: {body}")]
    Protocol { status: u16, body: String },

    #[error("Undecodable payload: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for QuoteSourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            QuoteSourceError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            QuoteSourceError::Protocol {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else {
            QuoteSourceError::Transport(e.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for QuoteSourceError {
    fn from(e: reqwest_middleware::Error) -> Self {
        match e {
            reqwest_middleware::Error::Reqwest(inner) => inner.into(),
            reqwest_middleware::Error::Middleware(inner) => {
                QuoteSourceError::Transport(inner.to_string())
            }
        }
    }
}

/// The venue a cycle input comes from, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    Ticker,
    Domestic,
    Fx,
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Venue::Ticker => write!(f, "ticker"),
            Venue::Domestic => write!(f, "domestic"),
            Venue::Fx => write!(f, "fx"),
        }
    }
}

/// Reasons an aggregation cycle produced no quotes.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("{venue} venue request failed: {source}")]
    Source {
        venue: Venue,
        #[source]
        source: QuoteSourceError,
    },

    #[error("{venue} venue response is missing {symbol}")]
    MissingQuote { venue: Venue, symbol: String },
}

impl CycleError {
    /// Adapter for `map_err` that tags a source failure with its venue.
    pub fn at(venue: Venue) -> impl FnOnce(QuoteSourceError) -> CycleError {
        move |source| CycleError::Source { venue, source }
    }
}

/// Rejected pin/unpin requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PinError {
    #[error("At most {max} assets can be pinned")]
    AtCapacity { max: usize },

    #[error("At least {min} asset must stay pinned")]
    LastPinned { min: usize },

    #[error("{0} is already pinned")]
    AlreadyPinned(Asset),

    #[error("{0} is not pinned")]
    NotPinned(Asset),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_error_formatting() {
        let err = CycleError::MissingQuote {
            venue: Venue::Domestic,
            symbol: "KRW-USDT".to_string(),
        };
        assert_eq!(err.to_string(), "domestic venue response is missing KRW-USDT");

        let err = CycleError::at(Venue::Ticker)(QuoteSourceError::Protocol {
            status: 503,
            body: "maintenance".to_string(),
        });
        let msg = err.to_string();
        assert!(msg.starts_with("ticker venue request failed"));
        assert!(msg.contains("503"));
    }

    #[test]
    fn test_pin_error_formatting() {
        assert_eq!(
            PinError::AtCapacity { max: 3 }.to_string(),
            "At most 3 assets can be pinned"
        );
        assert_eq!(PinError::NotPinned(Asset::Sol).to_string(), "SOL is not pinned");
    }
}
