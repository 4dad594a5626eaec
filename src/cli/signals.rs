//! OS close signals for the interactive session

use tokio::sync::mpsc;
use tracing::info;

/// Why the session was asked to close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseSignal {
    /// Ctrl+C / SIGINT
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl CloseSignal {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        }
    }
}

/// Close signal handler
///
/// Every received signal is forwarded, not just the first, so a second
/// Ctrl+C while a close is deferred ends the recording without its fade.
pub struct CloseSignalHandler {
    receiver: mpsc::Receiver<CloseSignal>,
}

impl CloseSignalHandler {
    /// Start listening for close signals
    pub fn new() -> Result<Self, std::io::Error> {
        let (tx, rx) = mpsc::channel(10);

        let tx_int = tx.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                info!("Received SIGINT");
                if tx_int.send(CloseSignal::Interrupt).await.is_err() {
                    break;
                }
            }
        });

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = signal(SignalKind::terminate())?;
            tokio::spawn(async move {
                while sigterm.recv().await.is_some() {
                    info!("Received SIGTERM");
                    if tx.send(CloseSignal::Terminate).await.is_err() {
                        break;
                    }
                }
            });
        }

        Ok(Self { receiver: rx })
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> Option<CloseSignal> {
        self.receiver.recv().await
    }
}
