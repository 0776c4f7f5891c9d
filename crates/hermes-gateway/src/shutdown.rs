//! Graceful shutdown.
//!
//! A [`ShutdownSignal`] stops the accept loop; a [`ConnectionTracker`]
//! lets the server wait for open connections to finish before returning.
//!
//! ```rust,ignore
//! use hermes_gateway::ShutdownSignal;
//!
//! let shutdown = ShutdownSignal::with_os_signals();
//! gateway.serve_with_shutdown(listener, shutdown).await?;
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// A cloneable trigger that every clone observes.
///
/// ```rust
/// use hermes_gateway::ShutdownSignal;
///
/// let shutdown = ShutdownSignal::new();
/// let observer = shutdown.clone();
///
/// shutdown.trigger();
/// shutdown.trigger();
/// assert!(observer.is_shutdown());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    token: CancellationToken,
}

impl ShutdownSignal {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a signal triggered by SIGINT or SIGTERM (Ctrl+C elsewhere).
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn with_os_signals() -> Self {
        let signal = Self::new();
        let trigger = signal.clone();
        tokio::spawn(async move {
            wait_for_os_signal().await;
            trigger.trigger();
        });
        signal
    }

    /// Triggers shutdown. Idempotent.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    /// Returns true once triggered.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes when shutdown is triggered, immediately if it already was.
    pub async fn recv(&self) {
        self.token.cancelled().await;
    }
}

async fn wait_for_os_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(err), _) | (_, Err(err)) => {
                    tracing::error!(error = %err, "failed to install signal handlers");
                    return std::future::pending().await;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
            _ = sigint.recv() => tracing::info!("received SIGINT, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            return std::future::pending().await;
        }
        tracing::info!("received Ctrl+C, shutting down");
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    active: AtomicUsize,
    idle: Notify,
}

/// Counts open connections.
///
/// ```rust
/// use hermes_gateway::shutdown::ConnectionTracker;
///
/// let tracker = ConnectionTracker::new();
/// let token = tracker.acquire();
/// assert_eq!(tracker.active_connections(), 1);
/// drop(token);
/// assert_eq!(tracker.active_connections(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    state: Arc<TrackerState>,
}

impl ConnectionTracker {
    /// Creates a tracker with no connections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection until the returned token is dropped.
    #[must_use]
    pub fn acquire(&self) -> ConnectionToken {
        self.state.active.fetch_add(1, Ordering::SeqCst);
        ConnectionToken {
            state: Arc::clone(&self.state),
        }
    }

    /// Number of open connections.
    #[must_use]
    pub fn active_connections(&self) -> usize {
        self.state.active.load(Ordering::SeqCst)
    }

    /// Completes once no connections are open.
    pub async fn drained(&self) {
        loop {
            let idle = self.state.idle.notified();
            tokio::pin!(idle);
            idle.as_mut().enable();
            if self.active_connections() == 0 {
                return;
            }
            idle.await;
        }
    }
}

/// An open connection, released on drop.
#[derive(Debug)]
pub struct ConnectionToken {
    state: Arc<TrackerState>,
}

impl Drop for ConnectionToken {
    fn drop(&mut self) {
        if self.state.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.state.idle.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_recv_completes_after_trigger() {
        let signal = ShutdownSignal::new();
        let trigger = signal.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.trigger();
        });

        tokio::time::timeout(Duration::from_secs(1), signal.recv())
            .await
            .expect("shutdown should be observed");
    }

    #[tokio::test]
    async fn test_recv_after_trigger_is_immediate() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        tokio::time::timeout(Duration::from_millis(10), signal.recv())
            .await
            .expect("already triggered");
    }

    #[test]
    fn test_tracker_counts() {
        let tracker = ConnectionTracker::new();
        let a = tracker.acquire();
        let b = tracker.clone().acquire();
        assert_eq!(tracker.active_connections(), 2);
        drop(a);
        drop(b);
        assert_eq!(tracker.active_connections(), 0);
    }

    #[tokio::test]
    async fn test_drained_waits_for_last_token() {
        let tracker = ConnectionTracker::new();
        let token = tracker.acquire();

        let waiter = tokio::spawn({
            let tracker = tracker.clone();
            async move { tracker.drained().await }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());
        drop(token);

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("drained should complete")
            .expect("task should not panic");
    }

    #[tokio::test]
    async fn test_drained_with_nothing_open() {
        let tracker = ConnectionTracker::new();
        tokio::time::timeout(Duration::from_millis(10), tracker.drained())
            .await
            .expect("nothing to wait for");
    }
}
