//! Graceful shutdown management

use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

/// Process-wide stop switch, flipped by Ctrl+C or [`ShutdownManager::trigger`]
pub struct ShutdownManager {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownManager {
    /// Create a new shutdown manager with running state
    pub fn new() -> Self {
        let (tx, _) = watch::channel(true);
        Self { tx: Arc::new(tx) }
    }

    /// Spawn a Ctrl+C signal handler that triggers shutdown
    pub fn spawn_signal_handler(&self) {
        let tx = Arc::clone(&self.tx);
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("");
                info!("Received shutdown signal (Ctrl+C)");
                info!("Shutting down gracefully...");
                tx.send_replace(false);
            }
        });
    }

    pub fn is_running(&self) -> bool {
        *self.tx.borrow()
    }

    /// Request shutdown without a signal
    pub fn trigger(&self) {
        self.tx.send_replace(false);
    }

    /// Sleep for a duration, waking as soon as shutdown is requested
    pub async fn interruptible_sleep(&self, duration: Duration) {
        let mut rx = self.tx.subscribe();
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = rx.wait_for(|running| !running) => {}
        }
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}
