use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// A handle/signal pair for stopping an RPC server. The server runs until the handle is dropped.
pub(crate) fn shutdown_signal() -> (RpcServerShutdownHandle, RpcServerShutdownSignal) {
    let (tx, rx) = oneshot::channel();

    (RpcServerShutdownHandle { _tx: tx }, RpcServerShutdownSignal { rx })
}

/// Whoever owns this owns the server's lifetime. Replicas hand it to their actor, config servers
/// to the `ConfigServerHandle`.
pub(crate) struct RpcServerShutdownHandle {
    _tx: oneshot::Sender<()>,
}

pub(crate) struct RpcServerShutdownSignal {
    rx: oneshot::Receiver<()>,
}

impl Future for RpcServerShutdownSignal {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // Nothing is ever sent, so this only completes once the handle is dropped.
        Pin::new(&mut self.rx).poll(cx).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn signal_fires_when_handle_is_dropped() {
        let (handle, mut signal) = shutdown_signal();

        assert!(timeout(Duration::from_millis(20), &mut signal).await.is_err());

        drop(handle);
        assert!(timeout(Duration::from_millis(20), signal).await.is_ok());
    }
}
