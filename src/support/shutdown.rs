//! Graceful shutdown handling
//!
//! A [`ShutdownSignal`] is a cloneable one-way latch: once triggered it
//! stays triggered, and every current or future waiter is released.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};

/// Shutdown latch shared across tasks
#[derive(Clone)]
pub struct ShutdownSignal {
    state: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.state.borrow()
    }

    /// Flip the latch. Later calls are no-ops.
    pub fn trigger(&self) {
        if !self.state.send_replace(true) {
            info!("Shutdown signal triggered");
        }
    }

    /// Resolves once the latch is set, immediately if it already is.
    pub async fn wait(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Block until the process receives SIGTERM or SIGINT (Ctrl+C elsewhere).
/// Returns the signal name, or `None` when no handler could be installed.
async fn wait_for_os_signal() -> Option<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        if let (Ok(mut sigterm), Ok(mut sigint)) = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            return tokio::select! {
                _ = sigterm.recv() => Some("SIGTERM"),
                _ = sigint.recv() => Some("SIGINT"),
            };
        }
        warn!("Unix signal handlers unavailable, falling back to Ctrl+C");
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => Some("Ctrl+C"),
        Err(e) => {
            error!("Failed to install Ctrl+C handler: {}", e);
            None
        }
    }
}

/// Trigger `shutdown` when the process is asked to stop.
pub async fn listen_for_shutdown_signals(shutdown: ShutdownSignal) {
    if let Some(name) = wait_for_os_signal().await {
        info!(signal = name, "Received OS shutdown signal");
        shutdown.trigger();
    }
}

/// Owns the process-wide signal and the drain deadline
pub struct ShutdownCoordinator {
    signal: ShutdownSignal,
    timeout: Duration,
}

impl ShutdownCoordinator {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            signal: ShutdownSignal::new(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn signal(&self) -> ShutdownSignal {
        self.signal.clone()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn start_signal_listener(&self) {
        tokio::spawn(listen_for_shutdown_signals(self.signal.clone()));
    }

    /// Run `drain` bounded by the shutdown timeout.
    /// Returns true if it completed, false if the timeout elapsed first.
    pub async fn drain_with_timeout<Fut>(&self, drain: Fut) -> bool
    where
        Fut: Future<Output = ()>,
    {
        info!(timeout_secs = self.timeout.as_secs(), "Draining");

        if tokio::time::timeout(self.timeout, drain).await.is_ok() {
            info!("Graceful shutdown completed");
            true
        } else {
            warn!(
                timeout_secs = self.timeout.as_secs(),
                "Graceful shutdown timed out"
            );
            false
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(30)
    }
}
