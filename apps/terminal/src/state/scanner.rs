//! # Scanner Toggle
//!
//! Open/closed flag for the camera view, with the short delay before it
//! opens.
//!
//! ```text
//!   open() ──► closed ──(open_delay)──► open
//!                │
//!   open() again │ restarts the delay
//!   close()      │ cancels the pending open
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Debounced scanner visibility.
///
/// Must be used from within a tokio runtime (the delay is a spawned task).
#[derive(Debug)]
pub struct ScannerToggle {
    open_tx: Arc<watch::Sender<bool>>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl ScannerToggle {
    pub fn new(delay: Duration) -> Self {
        let (open_tx, _) = watch::channel(false);
        ScannerToggle {
            open_tx: Arc::new(open_tx),
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedules the scanner to open after the delay.
    pub fn open(&self) {
        self.cancel_pending();
        self.open_tx.send_replace(false);

        let open_tx = self.open_tx.clone();
        let deadline = tokio::time::Instant::now() + self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            debug!("Scanner opened");
            open_tx.send_replace(true);
        });

        *self.pending.lock().unwrap_or_else(|p| p.into_inner()) = Some(task);
    }

    /// Closes the scanner and cancels any pending open.
    pub fn close(&self) {
        self.cancel_pending();
        if self.open_tx.send_replace(false) {
            debug!("Scanner closed");
        }
    }

    pub fn is_open(&self) -> bool {
        *self.open_tx.borrow()
    }

    /// Returns a receiver that observes open/close changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.open_tx.subscribe()
    }

    fn cancel_pending(&self) {
        if let Some(task) = self.pending.lock().unwrap_or_else(|p| p.into_inner()).take() {
            task.abort();
        }
    }
}

impl Drop for ScannerToggle {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(100);

    async fn settle() {
        // Let the spawned timer task run after a time advance.
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_opens_only_after_delay() {
        let toggle = ScannerToggle::new(DELAY);
        toggle.open();
        assert!(!toggle.is_open());

        tokio::time::advance(Duration::from_millis(99)).await;
        settle().await;
        assert!(!toggle.is_open());

        tokio::time::advance(Duration::from_millis(2)).await;
        settle().await;
        assert!(toggle.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reopen_restarts_delay() {
        let toggle = ScannerToggle::new(DELAY);
        toggle.open();
        tokio::time::advance(Duration::from_millis(60)).await;
        settle().await;

        toggle.open();
        tokio::time::advance(Duration::from_millis(60)).await;
        settle().await;
        assert!(!toggle.is_open());

        tokio::time::advance(Duration::from_millis(50)).await;
        settle().await;
        assert!(toggle.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_pending_open() {
        let toggle = ScannerToggle::new(DELAY);
        toggle.open();
        toggle.close();

        tokio::time::advance(Duration::from_millis(500)).await;
        settle().await;
        assert!(!toggle.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_changes() {
        let toggle = ScannerToggle::new(DELAY);
        let mut rx = toggle.subscribe();

        toggle.open();
        tokio::time::advance(DELAY).await;
        rx.wait_for(|open| *open).await.unwrap();

        toggle.close();
        assert!(!*rx.borrow());
    }
}
