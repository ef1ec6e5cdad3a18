//! Cooperative cancellation for a gate invocation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Liveness flag shared between a launch surface and its gate.
///
/// The surface cancels it on teardown. The gate checks it before every
/// side effect and races each suspension point against [`cancelled`].
///
/// [`cancelled`]: Liveness::cancelled
#[derive(Debug, Clone, Default)]
pub struct Liveness {
    inner: Arc<Inner>,
}

impl Liveness {
    /// Create a live token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the owner as torn down. Idempotent.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Whether the owner has been torn down.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Whether the owner is still mounted.
    pub fn is_alive(&self) -> bool {
        !self.is_cancelled()
    }

    /// Resolve once the token is cancelled.
    pub async fn cancelled(&self) {
        loop {
            // Register before checking so a concurrent cancel is not lost
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Guard that cancels this token when dropped.
    pub fn guard(&self) -> TeardownGuard {
        TeardownGuard {
            liveness: Some(self.clone()),
        }
    }
}

/// Cancels its [`Liveness`] on drop, mirroring a surface unmount.
#[derive(Debug)]
pub struct TeardownGuard {
    liveness: Option<Liveness>,
}

impl TeardownGuard {
    /// Drop the guard without cancelling.
    pub fn disarm(mut self) {
        self.liveness = None;
    }
}

impl Drop for TeardownGuard {
    fn drop(&mut self) {
        if let Some(liveness) = self.liveness.take() {
            liveness.cancel();
        }
    }
}
