// src/cancel.rs

//! Interrupt handling.
//!
//! The first SIGINT (or SIGTERM on Unix) raises a single process-wide
//! cancellation event. Every later signal is swallowed: the process is
//! already on its way out and must not run its shutdown logic twice.
//!
//! Cancellation stops at the top-level shutdown path. Child processes are
//! never killed because of it, so a child that ignores the signal keeps the
//! run alive until it exits on its own.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::errors::Result;

#[derive(Debug, Clone)]
pub struct CancellationController {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancellationController {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationController {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Raise the cancellation event. Returns `true` only for the call that
    /// actually raised it.
    pub fn cancel(&self) -> bool {
        self.tx.send_if_modified(|cancelled| {
            if *cancelled {
                false
            } else {
                *cancelled = true;
                true
            }
        })
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn handle(&self) -> CancelHandle {
        CancelHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Install the signal handlers and feed them into this controller.
    ///
    /// Once installed the handlers stay for the rest of the process, so
    /// repeated signals no longer fall back to the default "terminate"
    /// disposition.
    pub fn listen_for_signals(&self) -> Result<JoinHandle<()>> {
        #[cfg(unix)]
        let mut terminate =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

        let controller = self.clone();
        Ok(tokio::spawn(async move {
            loop {
                #[cfg(unix)]
                let signal = tokio::select! {
                    res = tokio::signal::ctrl_c() => match res {
                        Ok(()) => "SIGINT",
                        Err(e) => {
                            warn!(error = %e, "failed to listen for Ctrl+C");
                            return;
                        }
                    },
                    Some(()) = terminate.recv() => "SIGTERM",
                };

                #[cfg(not(unix))]
                let signal = match tokio::signal::ctrl_c().await {
                    Ok(()) => "Ctrl+C",
                    Err(e) => {
                        warn!(error = %e, "failed to listen for Ctrl+C");
                        return;
                    }
                };

                controller.on_signal(signal);
            }
        }))
    }

    fn on_signal(&self, signal: &str) {
        if self.cancel() {
            warn!(signal, "interrupted; running commands are left to exit on their own");
        } else {
            debug!(signal, "ignoring repeated signal");
        }
    }
}

/// Receiving side of the cancellation event.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    rx: watch::Receiver<bool>,
}

impl CancelHandle {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation has been raised. Never resolves if the
    /// controller goes away without cancelling.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
