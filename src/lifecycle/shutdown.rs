//! Shutdown coordination for the server.
//!
//! A [`Shutdown`] flips once, either from a process signal or from a test
//! holding a clone. Every [`ShutdownSignal`] observes the flip, including
//! signals subscribed after it happened.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// Coordinator for graceful shutdown.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Start shutting down. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Number of live subscribers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half of [`Shutdown`].
#[derive(Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolve once shutdown has been triggered or the coordinator is gone.
    pub async fn recv(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Resolve `grace` after shutdown was triggered.
    pub async fn deadline(mut self, grace: Duration) {
        self.recv().await;
        tokio::time::sleep(grace).await;
    }
}
