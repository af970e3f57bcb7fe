use nameth::NamedEnumValues as _;
use nameth::nameth;
use tokio::sync::oneshot;
use tracing::info;
use tracing::warn;

/// A handle to the fake connector running in the background.
#[must_use]
pub struct ServerHandle<R> {
    shutdown_tx: Option<oneshot::Sender<String>>,
    terminated_rx: Option<oneshot::Receiver<R>>,
}

impl<R> ServerHandle<R> {
    /// Returns the shutdown signal and termination sender for the server, and the handle for the caller.
    pub fn new() -> (impl Future<Output = ()>, oneshot::Sender<R>, Self) {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let shutdown_rx = async move {
            match shutdown_rx.await {
                Ok(reason) => info!("Server shutdown: {reason}"),
                Err(oneshot::error::RecvError { .. }) => warn!("Server handle dropped!"),
            }
        };
        let (terminated_tx, terminated_rx) = oneshot::channel();
        let handle = Self {
            shutdown_tx: Some(shutdown_tx),
            terminated_rx: Some(terminated_rx),
        };
        (shutdown_rx, terminated_tx, handle)
    }

    pub async fn stop(mut self, reason: impl std::fmt::Display) -> Result<R, ServerStopError> {
        let shutdown_tx = self.shutdown_tx.take().ok_or(ServerStopError::NotRunning)?;
        shutdown_tx
            .send(reason.to_string())
            .map_err(|_| ServerStopError::NotRunning)?;
        let terminated_rx = self
            .terminated_rx
            .take()
            .ok_or(ServerStopError::ShutdownError)?;
        terminated_rx
            .await
            .map_err(|_| ServerStopError::ShutdownError)
    }
}

impl<R> Drop for ServerHandle<R> {
    fn drop(&mut self) {
        if self.terminated_rx.is_some() && !std::thread::panicking() {
            warn!("The server was not shutdown");
        }
    }
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum ServerStopError {
    #[error("[{n}] The server was not running", n = self.name())]
    NotRunning,

    #[error("[{n}] The server did not fully shutdown", n = self.name())]
    ShutdownError,
}
