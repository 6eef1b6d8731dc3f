use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use vending_logging::{vending_debug, vending_info};

use crate::{FixedInterval, PriceSource, RetryPolicy};

struct PollTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Keeps the latest market price fresh by fetching it forever on a timer.
///
/// Fetches run one at a time: the next one is scheduled only after the
/// previous one has resolved. Failures are logged and otherwise ignored, so
/// the last good price stays current until a fetch succeeds again.
pub struct PricePoller {
    source: Arc<dyn PriceSource>,
    retry: Arc<dyn RetryPolicy>,
    price_tx: Arc<watch::Sender<Decimal>>,
    running: Option<PollTask>,
}

impl PricePoller {
    pub fn new(source: Arc<dyn PriceSource>, interval: Duration) -> Self {
        Self::with_retry_policy(source, Arc::new(FixedInterval(interval)))
    }

    pub fn with_retry_policy(source: Arc<dyn PriceSource>, retry: Arc<dyn RetryPolicy>) -> Self {
        let (price_tx, _) = watch::channel(Decimal::ZERO);
        Self {
            source,
            retry,
            price_tx: Arc::new(price_tx),
            running: None,
        }
    }

    /// Fetches immediately, then keeps polling. Must be called inside a tokio
    /// runtime. No-op while already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            self.source.clone(),
            self.retry.clone(),
            self.price_tx.clone(),
            cancel.clone(),
        ));
        vending_info!("price poller started");
        self.running = Some(PollTask { cancel, handle });
    }

    /// Cancels the pending timer and any in-flight fetch. A fetch that
    /// resolves after this point is discarded.
    pub fn stop(&mut self) {
        if let Some(task) = self.running.take() {
            task.cancel.cancel();
            task.handle.abort();
            vending_info!("price poller stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Last successfully fetched price; zero until the first success.
    pub fn current_price(&self) -> Decimal {
        *self.price_tx.borrow()
    }

    /// Receiver notified on every successful fetch.
    pub fn subscribe(&self) -> watch::Receiver<Decimal> {
        self.price_tx.subscribe()
    }
}

impl Drop for PricePoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(
    source: Arc<dyn PriceSource>,
    retry: Arc<dyn RetryPolicy>,
    price_tx: Arc<watch::Sender<Decimal>>,
    cancel: CancellationToken,
) {
    let mut consecutive_failures = 0u32;
    loop {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            outcome = source.fetch_price() => outcome,
        };
        if cancel.is_cancelled() {
            return;
        }

        match outcome {
            Ok(price) => {
                consecutive_failures = 0;
                vending_debug!("market price updated to {}", price);
                price_tx.send_replace(price);
            }
            Err(err) => {
                consecutive_failures = consecutive_failures.saturating_add(1);
                vending_debug!(
                    "price fetch failed ({} in a row), keeping last price: {}",
                    consecutive_failures,
                    err
                );
            }
        }

        let delay = retry.next_delay(consecutive_failures);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
