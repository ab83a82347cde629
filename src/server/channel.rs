use crate::replica::ReplicaError;
use std::future::Future;
use std::net::SocketAddr;
use tokio::sync::Mutex;
use tokio::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tonic::{Response, Status};

/// PeerChannel is a lazily connected, cached gRPC channel to one peer, with a per-call timeout.
///
/// The connection is made on first use. Any failure drops the cached channel so the next call
/// reconnects. Nothing is retried here.
pub(crate) struct PeerChannel {
    logger: slog::Logger,
    addr: SocketAddr,
    rpc_timeout: Duration,
    channel: Mutex<Option<Channel>>,
}

impl PeerChannel {
    pub fn new(logger: slog::Logger, addr: SocketAddr, rpc_timeout: Duration) -> Self {
        PeerChannel {
            logger: logger.new(slog::o!("peer" => addr.to_string())),
            addr,
            rpc_timeout,
            channel: Mutex::new(None),
        }
    }

    pub fn logger(&self) -> &slog::Logger {
        &self.logger
    }

    /// Run `call` against the peer. Times out with `Timeout`; any transport or status failure is
    /// `Disconnected`.
    pub async fn invoke<T, C, Fut>(&self, call: C) -> Result<T, ReplicaError>
    where
        C: FnOnce(Channel) -> Fut,
        Fut: Future<Output = Result<Response<T>, Status>>,
    {
        let attempt = async {
            let channel = self.connected_channel().await?;
            call(channel).await.map_err(|status| {
                slog::debug!(self.logger, "ClientWire - {:?}", status);
                ReplicaError::Disconnected
            })
        };

        let result = match tokio::time::timeout(self.rpc_timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(ReplicaError::Timeout),
        };

        match result {
            Ok(response) => Ok(response.into_inner()),
            Err(e) => {
                *self.channel.lock().await = None;
                Err(e)
            }
        }
    }

    async fn connected_channel(&self) -> Result<Channel, ReplicaError> {
        let mut cached = self.channel.lock().await;
        if let Some(channel) = cached.as_ref() {
            return Ok(channel.clone());
        }

        let endpoint = Endpoint::from_shared(format!("http://{}", self.addr)).map_err(|e| {
            slog::warn!(self.logger, "Invalid peer URI: {:?}", e);
            ReplicaError::Disconnected
        })?;
        let channel = endpoint.connect().await.map_err(|e| {
            slog::debug!(self.logger, "Failed to connect: {:?}", e);
            ReplicaError::Disconnected
        })?;

        *cached = Some(channel.clone());
        Ok(channel)
    }
}
