use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default quiet period before a typed query is sent
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Ticket-based debouncer.
///
/// Every call to [`Debouncer::settle`] takes a new ticket and waits out the
/// window; only the holder of the latest ticket is told to proceed.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    latest: AtomicU64,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            latest: AtomicU64::new(0),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wait for the quiet period. Returns `true` when no later call arrived
    /// in the meantime.
    pub async fn settle(&self) -> bool {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.window).await;
        self.latest.load(Ordering::SeqCst) == ticket
    }

    /// Invalidate whichever call is currently waiting
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_call_proceeds() {
        let debouncer = Debouncer::new(Duration::from_millis(400));
        let (a, b, c) = tokio::join!(
            debouncer.settle(),
            async {
                sleep(Duration::from_millis(100)).await;
                debouncer.settle().await
            },
            async {
                sleep(Duration::from_millis(200)).await;
                debouncer.settle().await
            },
        );
        assert_eq!((a, b, c), (false, false, true));
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_outside_window_all_proceed() {
        let debouncer = Debouncer::new(Duration::from_millis(400));
        assert!(debouncer.settle().await);
        assert!(debouncer.settle().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_invalidates_waiting_call() {
        let debouncer = Debouncer::default();
        let (settled, _) = tokio::join!(debouncer.settle(), async {
            sleep(Duration::from_millis(50)).await;
            debouncer.cancel();
        });
        assert!(!settled);
    }
}
