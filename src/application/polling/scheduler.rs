use crate::application::market_data::QuoteAggregator;
use crate::domain::ports::QuoteSubscriber;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

struct RunningLoop {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Drives the aggregator on a fixed interval and hands every successful
/// cycle to the registered subscriber.
///
/// At most one polling loop exists at a time, so the aggregator's trend and
/// FX state are never touched by two cycles at once.
pub struct PollingScheduler {
    aggregator: Arc<Mutex<QuoteAggregator>>,
    subscriber: Option<Arc<dyn QuoteSubscriber>>,
    running: Option<RunningLoop>,
}

impl PollingScheduler {
    pub fn new(aggregator: QuoteAggregator) -> Self {
        Self {
            aggregator: Arc::new(Mutex::new(aggregator)),
            subscriber: None,
            running: None,
        }
    }

    /// Registers the single subscriber, replacing any previous one.
    /// Takes effect on the next `start`.
    pub fn subscribe(&mut self, subscriber: Arc<dyn QuoteSubscriber>) {
        self.subscriber = Some(subscriber);
    }

    pub fn aggregator(&self) -> Arc<Mutex<QuoteAggregator>> {
        Arc::clone(&self.aggregator)
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    /// Runs a cycle right away, then one every `interval` until stopped.
    /// A loop that is already running is stopped first.
    pub async fn start(&mut self, interval: Duration) {
        self.stop().await;

        if self.subscriber.is_none() {
            warn!("PollingScheduler: Starting without a subscriber; quotes will be dropped");
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.aggregator),
            self.subscriber.clone(),
            interval,
            shutdown_rx,
        ));

        info!("PollingScheduler: Started (interval: {:?})", interval);
        self.running = Some(RunningLoop {
            shutdown_tx,
            handle,
        });
    }

    /// Interrupts the loop and waits for it to exit. No subscriber call
    /// happens once this returns.
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        let _ = running.shutdown_tx.send(true);
        if let Err(e) = running.handle.await {
            if e.is_panic() {
                error!("PollingScheduler: Polling loop panicked: {}", e);
            }
        }
        info!("PollingScheduler: Stopped");
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            let _ = running.shutdown_tx.send(true);
            running.handle.abort();
        }
    }
}

async fn run_loop(
    aggregator: Arc<Mutex<QuoteAggregator>>,
    subscriber: Option<Arc<dyn QuoteSubscriber>>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut consecutive_failures: u32 = 0;

    loop {
        // An in-flight cycle is dropped on stop; the aggregator only commits
        // state after its last await, so nothing is left half-applied.
        let outcome = tokio::select! {
            biased;
            _ = shutdown_rx.changed() => break,
            outcome = async { aggregator.lock().await.fetch_all().await } => outcome,
        };

        if *shutdown_rx.borrow() {
            break;
        }

        match outcome {
            Ok(quotes) => {
                if consecutive_failures > 0 {
                    info!(
                        "PollingScheduler: Recovered after {} failed cycle(s)",
                        consecutive_failures
                    );
                }
                consecutive_failures = 0;
                if let Some(subscriber) = &subscriber {
                    subscriber.on_quotes(&quotes);
                }
            }
            Err(e) => {
                consecutive_failures += 1;
                warn!(
                    "PollingScheduler: Cycle failed ({} in a row), keeping previous quotes: {}",
                    consecutive_failures, e
                );
            }
        }

        tokio::select! {
            biased;
            _ = shutdown_rx.changed() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    debug!("PollingScheduler: Loop exited");
}
