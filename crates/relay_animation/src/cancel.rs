//! Cancellation shared between a running chain and its host

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Clonable cancellation flag.
///
/// Every clone observes the same state. Once cancelled a token stays
/// cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token and wake every pending [`CancelToken::cancelled`]
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            tracing::debug!("animation chain cancelled");
            self.inner.notify.notify_waiters();
        }
    }

    /// True if both tokens are clones of the same token
    pub fn ptr_eq(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once the token is cancelled
    pub async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel isn't missed
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
