use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Quiet period used when the config does not override it.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Collapses bursts of values into one settled value.
///
/// Every [`push`](Debouncer::push) restarts the quiet-period timer; only the
/// last value of a burst is sent, once, after the input stays unchanged for
/// the whole period. Dropping the debouncer cancels a pending timer.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    sender: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(quiet: Duration, sender: mpsc::UnboundedSender<T>) -> Self {
        Self {
            quiet,
            sender,
            pending: None,
        }
    }

    /// Replace the pending value and restart the timer.
    pub fn push(&mut self, value: T) {
        self.cancel();
        let sender = self.sender.clone();
        let quiet = self.quiet;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            let _ = sender.send(value);
        }));
    }

    /// Drop the pending value, if any, without sending it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn burst_settles_once_on_last_value() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(QUIET, tx);

        for value in ["b", "ba", "bat", "batm", "batma", "batman"] {
            debouncer.push(value.to_string());
            tokio::time::advance(Duration::from_millis(120)).await;
        }

        assert_eq!(rx.recv().await.as_deref(), Some("batman"));
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_full_quiet_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(QUIET, tx);

        debouncer.push(1u32);
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(499)).await;
        assert!(rx.try_recv().is_err());
        assert!(debouncer.is_pending());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(rx.recv().await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn separated_values_each_settle() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(QUIET, tx);

        debouncer.push("a");
        assert_eq!(rx.recv().await, Some("a"));
        debouncer.push("b");
        assert_eq!(rx.recv().await, Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(QUIET, tx);

        debouncer.push("never");
        drop(debouncer);

        // All senders are gone once the aborted timer task is dropped.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_pending_value() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(QUIET, tx);

        debouncer.push("first");
        debouncer.cancel();
        debouncer.push("second");
        assert_eq!(rx.recv().await, Some("second"));
    }
}
