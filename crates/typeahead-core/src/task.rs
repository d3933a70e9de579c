//! Cancellable deferred work on a Tokio runtime.
//!
//! Typeahead fields schedule three kinds of background work: the debounce
//! timer, the in-flight search and the blur grace timer. Each is tied to a
//! [`CancellationToken`] so that superseding or tearing down the work is a
//! single `cancel()` call.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use typeahead_core::task::{CancellationToken, spawn_delayed};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let token = CancellationToken::new();
//! spawn_delayed(
//!     &tokio::runtime::Handle::current(),
//!     Duration::from_millis(200),
//!     token.clone(),
//!     || println!("quiet period elapsed"),
//! );
//!
//! // A newer keystroke arrived: the pending call never runs.
//! token.cancel();
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::Notify;

use crate::logging::targets;

/// A cancellation token for async tasks.
///
/// Cloning shares the underlying state; cancelling any clone cancels all.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    inner: Arc<CancellationState>,
}

#[derive(Debug)]
struct CancellationState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    /// Create a new cancellation token.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CancellationState {
                cancelled: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    /// Check if cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Request cancellation.
    ///
    /// This sets the cancellation flag and notifies any waiters.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::Release) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Wait asynchronously until cancellation is requested.
    ///
    /// Returns immediately if already cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
            if self.is_cancelled() {
                return;
            }
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive `future` to completion unless `token` is cancelled first.
///
/// Returns `None` when cancelled; the future is dropped at that point, which
/// aborts any I/O it owns.
pub async fn run_until_cancelled<F>(token: &CancellationToken, future: F) -> Option<F::Output>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        output = future => Some(output),
    }
}

/// Run `f` on `runtime` after `delay`, unless `token` is cancelled first.
pub fn spawn_delayed<F>(runtime: &Handle, delay: Duration, token: CancellationToken, f: F)
where
    F: FnOnce() + Send + 'static,
{
    runtime.spawn(async move {
        if run_until_cancelled(&token, tokio::time::sleep(delay)).await.is_some() {
            f();
        } else {
            tracing::trace!(target: targets::TASK, ?delay, "deferred task cancelled");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn test_delayed_task_runs_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();

        spawn_delayed(
            &Handle::current(),
            Duration::from_millis(200),
            CancellationToken::new(),
            move || {
                fired_clone.fetch_add(1, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(Duration::from_millis(199)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_never_runs() {
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();
        let token = CancellationToken::new();

        spawn_delayed(
            &Handle::current(),
            Duration::from_millis(50),
            token.clone(),
            move || {
                fired_clone.fetch_add(1, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_until_cancelled() {
        let token = CancellationToken::new();
        assert_eq!(run_until_cancelled(&token, async { 7 }).await, Some(7));

        token.cancel();
        assert!(token.is_cancelled());
        let pending = std::future::pending::<()>();
        assert_eq!(run_until_cancelled(&token, pending).await, None);
    }
}
