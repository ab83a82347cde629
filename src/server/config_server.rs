use crate::config::ConfigAuthority;
use crate::grpc::config_service_server::{ConfigService, ConfigServiceServer};
use crate::grpc::{
    ProtoAllocateEpochReq, ProtoAllocateEpochResult, ProtoEmptyResult, ProtoGetConfigReq, ProtoGetConfigResult,
    ProtoGetLeaseReq, ProtoGetLeaseResult, ProtoWriteConfigReq,
};
use crate::replica::{Epoch, ReplicaError};
use crate::server::{shutdown_signal, wire, RpcServerShutdownHandle, RpcServerShutdownSignal};
use std::convert::TryFrom;
use std::net::SocketAddr;
use std::sync::Arc;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

/// ConfigRpcServer exposes any `ConfigAuthority` over gRPC.
pub struct ConfigRpcServer {
    logger: slog::Logger,
    authority: Arc<dyn ConfigAuthority>,
}

/// Stops the config server when dropped.
pub struct ConfigServerHandle {
    _shutdown_handle: RpcServerShutdownHandle,
}

/// Spawn a gRPC config server for `authority` on `socket_addr`.
pub fn spawn_config_server(
    logger: slog::Logger,
    socket_addr: SocketAddr,
    authority: Arc<dyn ConfigAuthority>,
) -> ConfigServerHandle {
    let (shutdown_handle, shutdown_signal) = shutdown_signal();
    let server = ConfigRpcServer::new(logger, authority);
    tokio::spawn(server.run(socket_addr, shutdown_signal));

    ConfigServerHandle {
        _shutdown_handle: shutdown_handle,
    }
}

impl ConfigRpcServer {
    pub fn new(logger: slog::Logger, authority: Arc<dyn ConfigAuthority>) -> Self {
        ConfigRpcServer { logger, authority }
    }

    pub(crate) async fn run(self, socket_addr: SocketAddr, shutdown_signal: RpcServerShutdownSignal) {
        let logger = self.logger.clone();
        slog::info!(logger, "Config server listening on '{:?}'", socket_addr);

        let result = Server::builder()
            .add_service(ConfigServiceServer::new(self))
            .serve_with_shutdown(socket_addr, shutdown_signal)
            .await;

        slog::info!(logger, "Config server run() has exited: {:?}", result);
    }

    // The authority has no error that a client can act on here other than a transport failure.
    fn convert_error(e: ReplicaError) -> Status {
        Status::unavailable(e.to_string())
    }
}

#[async_trait::async_trait]
impl ConfigService for ConfigRpcServer {
    async fn allocate_epoch_and_config(
        &self,
        _: Request<ProtoAllocateEpochReq>,
    ) -> Result<Response<ProtoAllocateEpochResult>, Status> {
        let (epoch, members) = self
            .authority
            .allocate_epoch_and_config()
            .await
            .map_err(Self::convert_error)?;

        Ok(Response::new(ProtoAllocateEpochResult {
            epoch: epoch.as_u64(),
            members: wire::addrs_to_proto(&members),
        }))
    }

    async fn write_config(
        &self,
        rpc_request_wrapped: Request<ProtoWriteConfigReq>,
    ) -> Result<Response<ProtoEmptyResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);

        let members = wire::addrs_from_proto(&rpc_request.members)?;
        let result = self
            .authority
            .write_config(Epoch::new(rpc_request.epoch), members)
            .await;

        Ok(Response::new(wire::empty_result_to_proto(result)))
    }

    async fn get_config(&self, _: Request<ProtoGetConfigReq>) -> Result<Response<ProtoGetConfigResult>, Status> {
        let members = self.authority.get_config().await.map_err(Self::convert_error)?;

        Ok(Response::new(ProtoGetConfigResult {
            members: wire::addrs_to_proto(&members),
        }))
    }

    async fn get_lease(
        &self,
        rpc_request_wrapped: Request<ProtoGetLeaseReq>,
    ) -> Result<Response<ProtoGetLeaseResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();
        let lease = self
            .authority
            .get_lease(Epoch::new(rpc_request.epoch))
            .await
            .map_err(Self::convert_error)?;

        let expires_at_unix_millis = lease
            .expires_at
            .and_then(|expires_at| u64::try_from(expires_at.timestamp_millis()).ok())
            .unwrap_or(0);

        Ok(Response::new(ProtoGetLeaseResult {
            granted: lease.granted && expires_at_unix_millis > 0,
            expires_at_unix_millis,
        }))
    }
}
