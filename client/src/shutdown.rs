//! Cancellation for background tasks (winner polls, wallet watcher, event loop).

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::signal;
use tokio::sync::broadcast;

/// Fans one stop signal out to every background task of a session.
///
/// A broadcast receiver only sees signals sent after it subscribed, so tasks
/// started late should check [`is_triggered`](Self::is_triggered) first.
pub struct ShutdownController {
    tx: broadcast::Sender<()>,
    triggered: AtomicBool,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            triggered: AtomicBool::new(false),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Stop every subscribed task. Repeated calls are no-ops.
    pub fn shutdown(&self) {
        if self.triggered.swap(true, Ordering::SeqCst) {
            return;
        }
        let stopped = self.tx.send(()).unwrap_or(0);
        tracing::debug!(tasks = stopped, "shutdown signalled");
    }

    /// Resolve on Ctrl-C and stop everything. If the handler cannot be
    /// installed this never resolves, leaving the other branch of a
    /// `select!` in charge.
    pub async fn wait_for_signal(&self) {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("interrupted, stopping background tasks");
        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_is_stopped() {
        let controller = ShutdownController::new();
        let mut poll = controller.subscribe();
        let mut watcher = controller.subscribe();
        controller.shutdown();
        assert!(poll.recv().await.is_ok());
        assert!(watcher.recv().await.is_ok());
        assert!(controller.is_triggered());
    }

    #[test]
    fn second_shutdown_is_ignored() {
        let controller = ShutdownController::new();
        let mut rx = controller.subscribe();
        controller.shutdown();
        controller.shutdown();
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
