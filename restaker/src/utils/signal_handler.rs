use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[cfg(unix)]
use signal::unix::{signal, SignalKind};

use crate::error::{AgentError, AgentResult};

/// Signal types that can trigger shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGTERM - service manager shutdown
    Terminate,
    /// SIGINT - Ctrl+C interactive shutdown
    Interrupt,
    /// SIGQUIT - Quit signal
    Quit,
    /// Internal - the scheduler stopped on its own
    Internal,
}

impl std::fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownSignal::Terminate => write!(f, "SIGTERM"),
            ShutdownSignal::Interrupt => write!(f, "SIGINT"),
            ShutdownSignal::Quit => write!(f, "SIGQUIT"),
            ShutdownSignal::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Turns process signals into cancellation of a shared token.
pub struct SignalHandler {
    shutdown_signal: Option<ShutdownSignal>,
    cancellation_token: CancellationToken,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self { shutdown_signal: None, cancellation_token: CancellationToken::new() }
    }

    /// Token cancelled once a shutdown signal arrives. Cancelling it directly requests an internal shutdown.
    pub fn token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Wait for any shutdown signal, cancel the token and return which one was received
    pub async fn wait_for_shutdown(&mut self) -> AgentResult<ShutdownSignal> {
        let signal = self.wait_for_signal().await?;
        self.shutdown_signal = Some(signal);
        self.cancellation_token.cancel();
        info!("🛑 Received shutdown signal: {}", signal);
        Ok(signal)
    }

    pub fn shutdown_signal(&self) -> Option<ShutdownSignal> {
        self.shutdown_signal
    }

    #[cfg(unix)]
    async fn wait_for_signal(&self) -> AgentResult<ShutdownSignal> {
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigquit = signal(SignalKind::quit())?;

        info!("📡 Signal handler initialized, listening for SIGTERM, SIGINT and SIGQUIT");

        Ok(tokio::select! {
            _ = sigterm.recv() => ShutdownSignal::Terminate,
            _ = sigint.recv() => ShutdownSignal::Interrupt,
            _ = sigquit.recv() => {
                warn!("Force quit signal received (SIGQUIT)");
                ShutdownSignal::Quit
            }
            _ = self.cancellation_token.cancelled() => ShutdownSignal::Internal,
        })
    }

    #[cfg(not(unix))]
    async fn wait_for_signal(&self) -> AgentResult<ShutdownSignal> {
        info!("Signal handler initialized, listening for Ctrl+C");

        Ok(tokio::select! {
            result = signal::ctrl_c() => {
                result?;
                ShutdownSignal::Interrupt
            }
            _ = self.cancellation_token.cancelled() => ShutdownSignal::Internal,
        })
    }

    /// Waits for `shutdown_fn` to finish, giving up after `timeout_secs`.
    ///
    /// A pass that already broadcast a transaction keeps waiting for its receipt, so the
    /// timeout should cover the confirmation timeout.
    pub async fn handle_graceful_shutdown<F, Fut>(&self, shutdown_fn: F, timeout_secs: u64) -> AgentResult<()>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = AgentResult<()>>,
    {
        let signal = self.shutdown_signal.unwrap_or(ShutdownSignal::Interrupt);
        info!(timeout_secs, "Starting graceful shutdown (triggered by: {})", signal);

        match tokio::time::timeout(tokio::time::Duration::from_secs(timeout_secs), shutdown_fn()).await {
            Ok(Ok(())) => {
                info!("✅ Graceful shutdown completed successfully");
                Ok(())
            }
            Ok(Err(e)) => {
                error!("❌ Graceful shutdown failed: {}", e);
                Err(e)
            }
            Err(_) => {
                error!("⏰ Graceful shutdown timed out after {} seconds", timeout_secs);
                if signal == ShutdownSignal::Quit {
                    warn!("💥 SIGQUIT received - forcing immediate exit");
                    std::process::exit(1);
                }
                Err(AgentError::RunCommandError("Shutdown timeout exceeded".to_string()))
            }
        }
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn cancelled_token_counts_as_internal_shutdown() {
        let mut handler = SignalHandler::new();
        handler.token().cancel();
        assert_eq!(handler.wait_for_shutdown().await.unwrap(), ShutdownSignal::Internal);
        assert_eq!(handler.shutdown_signal(), Some(ShutdownSignal::Internal));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_shutdown_times_out() {
        let handler = SignalHandler::new();
        let result = handler
            .handle_graceful_shutdown(
                || async {
                    tokio::time::sleep(std::time::Duration::from_secs(60)).await;
                    Ok(())
                },
                5,
            )
            .await;
        assert_matches!(result, Err(AgentError::RunCommandError(_)));
    }
}
