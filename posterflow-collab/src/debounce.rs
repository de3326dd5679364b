//! Cancellable debounce timer.
//!
//! Wraps the arm/reset/cancel lifecycle of a single pending task so that
//! "teardown cancels pending work" holds mechanically: dropping the
//! [`Debouncer`] aborts whatever is still scheduled.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Quiescence window used for remote pushes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

/// A single-slot scheduled task with a quiescence window.
///
/// [`arm`](Debouncer::arm) replaces any pending task, so rapid calls
/// coalesce into one execution `window` after the last call.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Schedule `fut` to run after the quiescence window, cancelling any
    /// previously armed task (this is the "reset" of a debounce).
    pub fn arm<F>(&mut self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            fut.await;
        }));
    }

    /// Abort the pending task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a task is currently scheduled and not yet finished.
    pub fn is_armed(&self) -> bool {
        self.pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::advance;

    fn counter_task(counter: &Arc<AtomicU32>) -> impl Future<Output = ()> + Send + 'static {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_window() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(1000));

        debouncer.arm(counter_task(&counter));
        tokio::task::yield_now().await;

        advance(Duration::from_millis(999)).await;
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_armed());

        advance(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_resets_window() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(1000));

        debouncer.arm(counter_task(&counter));
        tokio::task::yield_now().await;
        advance(Duration::from_millis(800)).await;

        // Re-arm before the first window elapses.
        debouncer.arm(counter_task(&counter));
        tokio::task::yield_now().await;
        advance(Duration::from_millis(800)).await;
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        advance(Duration::from_millis(201)).await;
        tokio::task::yield_now().await;
        // Exactly one execution despite two arms.
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_execution() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(100));

        debouncer.arm(counter_task(&counter));
        tokio::task::yield_now().await;
        debouncer.cancel();
        assert!(!debouncer.is_armed());

        advance(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending() {
        let counter = Arc::new(AtomicU32::new(0));
        {
            let mut debouncer = Debouncer::new(Duration::from_millis(100));
            debouncer.arm(counter_task(&counter));
            tokio::task::yield_now().await;
        }

        advance(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unarmed_by_default() {
        let debouncer = Debouncer::new(DEFAULT_DEBOUNCE);
        assert!(!debouncer.is_armed());
        assert_eq!(debouncer.window(), Duration::from_secs(1));
    }
}
