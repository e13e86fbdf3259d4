//! Debouncing of raw search input.
//!
//! Rapid keystrokes are coalesced into a single settled query once input
//! has been quiet for the configured interval. Settled values are emitted
//! on an unbounded channel; the consumer (the session controller) decides
//! what to do with them. A debouncer never blocks and has no error states.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

/// Default quiet interval before input is considered settled.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

struct DebounceInner {
    /// Most recent trimmed input.
    latest: String,
    /// Timer task for the pending emission, if any.
    pending: Option<JoinHandle<()>>,
}

/// Coalesces rapid `submit` calls into at most one emission per quiet period.
///
/// Each `submit` restarts the timer and discards the previously pending
/// emission outright - a superseded value never fires. `flush_now` bypasses
/// the delay for explicit search triggers (Enter key, search button).
///
/// Timer tasks run on the tokio runtime; construct under one.
pub struct QueryDebouncer {
    delay: Duration,
    tx: mpsc::UnboundedSender<String>,
    inner: Arc<Mutex<DebounceInner>>,
}

impl QueryDebouncer {
    /// Create a debouncer and the receiver its settled values arrive on.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            tx,
            inner: Arc::new(Mutex::new(DebounceInner {
                latest: String::new(),
                pending: None,
            })),
        };
        (debouncer, rx)
    }

    /// Record new raw input and restart the quiet-period timer.
    pub fn submit(&self, raw: &str) {
        let trimmed = raw.trim().to_string();
        let tx = self.tx.clone();
        let delay = self.delay;

        let mut inner = self.inner.lock().unwrap();
        inner.latest = trimmed.clone();
        if let Some(pending) = inner.pending.take() {
            pending.abort();
        }
        inner.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            // Receiver gone means the session is shutting down.
            let _ = tx.send(trimmed);
        }));
    }

    /// Emit the latest input immediately, cancelling any pending timer.
    pub fn flush_now(&self) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(pending) = inner.pending.take() {
            pending.abort();
        }
        let _ = self.tx.send(inner.latest.clone());
    }

    /// Drop any pending emission without firing.
    pub fn cancel(&self) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(pending) = inner.pending.take() {
            pending.abort();
        }
    }

    /// The most recently submitted (trimmed) input.
    pub fn latest(&self) -> String {
        self.inner.lock().unwrap().latest.clone()
    }
}

impl Drop for QueryDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    const DELAY: Duration = Duration::from_millis(300);

    /// Let aborted/spawned timer tasks get a chance to run.
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_submits_emit_once_with_last_value() {
        let (debouncer, mut rx) = QueryDebouncer::new(DELAY);

        debouncer.submit("g");
        advance(Duration::from_millis(50)).await;
        debouncer.submit("ga");
        advance(Duration::from_millis(50)).await;
        debouncer.submit("gatsby");

        advance(DELAY).await;
        settle().await;

        assert_eq!(rx.recv().await.unwrap(), "gatsby");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_emission_before_quiet_period() {
        let (debouncer, mut rx) = QueryDebouncer::new(DELAY);

        debouncer.submit("dune");
        advance(Duration::from_millis(299)).await;
        settle().await;

        assert!(rx.try_recv().is_err());

        advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(rx.recv().await.unwrap(), "dune");
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_submit_restarts_timer() {
        let (debouncer, mut rx) = QueryDebouncer::new(DELAY);

        debouncer.submit("a");
        advance(Duration::from_millis(200)).await;
        debouncer.submit("ab");
        // 200ms after the second submit the first timer would have fired
        advance(Duration::from_millis(200)).await;
        settle().await;
        assert!(rx.try_recv().is_err());

        advance(Duration::from_millis(100)).await;
        settle().await;
        assert_eq!(rx.recv().await.unwrap(), "ab");
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_now_bypasses_delay() {
        let (debouncer, mut rx) = QueryDebouncer::new(DELAY);

        debouncer.submit("emma");
        debouncer.flush_now();
        settle().await;

        assert_eq!(rx.recv().await.unwrap(), "emma");

        // The cancelled timer must not fire a second emission
        advance(DELAY).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending() {
        let (debouncer, mut rx) = QueryDebouncer::new(DELAY);

        debouncer.submit("emma");
        debouncer.cancel();

        advance(DELAY).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_is_trimmed() {
        let (debouncer, mut rx) = QueryDebouncer::new(DELAY);

        debouncer.submit("  emma  ");
        advance(DELAY).await;
        settle().await;

        assert_eq!(rx.recv().await.unwrap(), "emma");
        assert_eq!(debouncer.latest(), "emma");
    }
}
