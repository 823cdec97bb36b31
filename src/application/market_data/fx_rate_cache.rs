use crate::domain::errors::QuoteSourceError;
use crate::domain::ports::FxRateSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FxCacheEntry {
    pub rate: f64,
    pub fetched_at: Instant,
}

/// Single-slot, lazily refreshed cache for the one tracked FX pair.
pub struct FxRateCache {
    source: Arc<dyn FxRateSource>,
    entry: Option<FxCacheEntry>,
}

impl FxRateCache {
    pub fn new(source: Arc<dyn FxRateSource>) -> Self {
        Self {
            source,
            entry: None,
        }
    }

    pub fn cached(&self) -> Option<FxCacheEntry> {
        self.entry
    }

    /// Returns the cached rate while it is younger than `max_age`, otherwise
    /// fetches once. A failed fetch leaves the previous entry in place.
    pub async fn get_rate(&mut self, max_age: Duration) -> Result<f64, QuoteSourceError> {
        if let Some(entry) = self.entry {
            let age = entry.fetched_at.elapsed();
            if age < max_age {
                debug!("FxRateCache: Hit (age {:?}) rate={}", age, entry.rate);
                return Ok(entry.rate);
            }
        }

        let rate = self.source.fetch_rate().await?;
        self.entry = Some(FxCacheEntry {
            rate,
            fetched_at: Instant::now(),
        });
        info!("FxRateCache: Refreshed rate={}", rate);
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedFx {
        calls: AtomicUsize,
        responses: Mutex<Vec<Result<f64, QuoteSourceError>>>,
    }

    impl ScriptedFx {
        fn new(mut responses: Vec<Result<f64, QuoteSourceError>>) -> Arc<Self> {
            responses.reverse();
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                responses: Mutex::new(responses),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FxRateSource for ScriptedFx {
        async fn fetch_rate(&self) -> Result<f64, QuoteSourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(QuoteSourceError::Transport("script exhausted".into())))
        }
    }

    const TTL: Duration = Duration::from_secs(1800);

    #[tokio::test(start_paused = true)]
    async fn test_second_call_within_ttl_hits_cache() {
        let fx = ScriptedFx::new(vec![Ok(1340.0), Ok(1355.0)]);
        let mut cache = FxRateCache::new(fx.clone());

        assert_eq!(cache.get_rate(TTL).await.unwrap(), 1340.0);
        tokio::time::advance(Duration::from_secs(1799)).await;
        assert_eq!(cache.get_rate(TTL).await.unwrap(), 1340.0);
        assert_eq!(fx.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_after_ttl_refetches() {
        let fx = ScriptedFx::new(vec![Ok(1340.0), Ok(1355.0)]);
        let mut cache = FxRateCache::new(fx.clone());

        cache.get_rate(TTL).await.unwrap();
        tokio::time::advance(TTL).await;
        assert_eq!(cache.get_rate(TTL).await.unwrap(), 1355.0);
        assert_eq!(fx.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_keeps_previous_entry() {
        let fx = ScriptedFx::new(vec![
            Ok(1340.0),
            Err(QuoteSourceError::Protocol {
                status: 500,
                body: String::new(),
            }),
            Ok(1360.0),
        ]);
        let mut cache = FxRateCache::new(fx.clone());

        cache.get_rate(TTL).await.unwrap();
        let first = cache.cached().unwrap();

        tokio::time::advance(TTL + Duration::from_secs(1)).await;
        assert!(cache.get_rate(TTL).await.is_err());
        assert_eq!(cache.cached(), Some(first));

        // Stale entry is still subject to its own age check
        assert_eq!(cache.get_rate(TTL).await.unwrap(), 1360.0);
        assert_eq!(fx.calls(), 3);
    }
}
