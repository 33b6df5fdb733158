use std::fmt;
use tokio::sync::watch;

/// Why the poll loop was asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Interrupt,
    Terminate,
    /// Signal handlers could not be installed; stop rather than run unkillable.
    SignalSetupFailed,
    Requested,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ShutdownReason::Interrupt => "SIGINT",
            ShutdownReason::Terminate => "SIGTERM",
            ShutdownReason::SignalSetupFailed => "signal-setup-failed",
            ShutdownReason::Requested => "requested",
        };
        f.write_str(label)
    }
}

/// Cancellation token handed to the poll loop.
#[derive(Clone)]
pub struct Shutdown {
    rx: watch::Receiver<Option<ShutdownReason>>,
}

/// Fires the token. The first reason sent wins.
#[derive(Clone)]
pub struct ShutdownTrigger {
    tx: watch::Sender<Option<ShutdownReason>>,
}

pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(None);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

impl Shutdown {
    pub fn reason(&self) -> Option<ShutdownReason> {
        *self.rx.borrow()
    }

    pub fn is_triggered(&self) -> bool {
        self.reason().is_some()
    }

    /// Resolves with the reason once shutdown has been triggered.
    pub async fn wait(&mut self) -> ShutdownReason {
        loop {
            if let Some(reason) = *self.rx.borrow_and_update() {
                return reason;
            }
            if self.rx.changed().await.is_err() {
                // Every trigger is gone, nothing can fire any more.
                return std::future::pending().await;
            }
        }
    }
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        self.trigger_with(ShutdownReason::Requested);
    }

    pub fn trigger_with(&self, reason: ShutdownReason) {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> ShutdownReason {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => term,
        Err(err) => {
            tracing::warn!(
                target: "uatu_pricewatch::shutdown",
                error = %err,
                "Could not listen for SIGTERM"
            );
            return ShutdownReason::SignalSetupFailed;
        }
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => ShutdownReason::Interrupt,
            Err(_) => ShutdownReason::SignalSetupFailed,
        },
        _ = term.recv() => ShutdownReason::Terminate,
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> ShutdownReason {
    match tokio::signal::ctrl_c().await {
        Ok(()) => ShutdownReason::Interrupt,
        Err(_) => ShutdownReason::SignalSetupFailed,
    }
}

/// Wait for Ctrl-C or SIGTERM and fire `trigger`.
pub async fn listen_for_shutdown(trigger: ShutdownTrigger) {
    let reason = wait_for_signal().await;
    tracing::info!(target: "uatu_pricewatch::shutdown", %reason, "Stopping price watch");
    trigger.trigger_with(reason);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_returns_reason_after_trigger() {
        let (trigger, mut shutdown) = channel();
        assert!(!shutdown.is_triggered());
        assert_eq!(shutdown.reason(), None);

        let waiter = tokio::spawn(async move { shutdown.wait().await });
        trigger.trigger_with(ShutdownReason::Terminate);

        let reason = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reason, ShutdownReason::Terminate);
    }

    #[tokio::test]
    async fn test_first_reason_wins() {
        let (trigger, shutdown) = channel();
        let other = shutdown.clone();

        trigger.trigger_with(ShutdownReason::Interrupt);
        trigger.trigger();

        assert_eq!(shutdown.reason(), Some(ShutdownReason::Interrupt));
        assert!(other.is_triggered());
    }

    #[tokio::test]
    async fn test_dropped_trigger_never_fires() {
        let (trigger, mut shutdown) = channel();
        drop(trigger);

        let result = tokio::time::timeout(Duration::from_millis(20), shutdown.wait()).await;
        assert!(result.is_err());
        assert!(!shutdown.is_triggered());
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(ShutdownReason::Interrupt.to_string(), "SIGINT");
        assert_eq!(ShutdownReason::Terminate.to_string(), "SIGTERM");
        assert_eq!(ShutdownReason::Requested.to_string(), "requested");
    }
}
