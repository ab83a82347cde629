use crate::actor::{ActorClient, WeakActorClient};
use crate::commitlog::Index;
use crate::grpc::replica_service_server::{ReplicaService, ReplicaServiceServer};
use crate::grpc::{
    proto_apply_result, proto_get_state_result, ProtoApplyAsBackupReq, ProtoApplyReq, ProtoApplyResult,
    ProtoApplySuccess, ProtoBecomePrimaryReq, ProtoEmptyResult, ProtoGetStateReq, ProtoGetStateResult,
    ProtoGetStateSuccess, ProtoSetStateReq,
};
use crate::replica::{
    ApplyAsBackupInput, ApplyInput, ApplyOutput, BecomePrimaryInput, Epoch, GetStateInput, GetStateOutput,
    ReplicaError, ReplicaRpc, SetStateInput,
};
use crate::server::wire;
use crate::server::RpcServerShutdownSignal;
use bytes::Bytes;
use std::net::SocketAddr;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

/// ReplicaRpcServer is the type that implements the replica gRPC interface.
pub struct ReplicaRpcServer {
    logger: slog::Logger,
    local_replica: WeakActorClient,
}

impl ReplicaRpcServer {
    pub fn new(logger: slog::Logger, local_replica: WeakActorClient) -> Self {
        ReplicaRpcServer { logger, local_replica }
    }

    pub(crate) async fn run(self, socket_addr: SocketAddr, shutdown_signal: RpcServerShutdownSignal) {
        let logger = self.logger.clone();
        slog::info!(logger, "Listening on '{:?}'", socket_addr);

        let result = Server::builder()
            .add_service(ReplicaServiceServer::new(self))
            .serve_with_shutdown(socket_addr, shutdown_signal)
            .await;

        slog::info!(logger, "Server run() has exited: {:?}", result);
    }

    fn replica(&self) -> Result<ActorClient, Status> {
        self.local_replica
            .upgrade()
            .ok_or_else(|| Status::unavailable("Replica has stopped"))
    }

    async fn handle_apply(&self, rpc_request: ProtoApplyReq) -> Result<ProtoApplyResult, Status> {
        let app_input = ApplyInput {
            op: Bytes::from(rpc_request.op),
        };
        let app_result = self.replica()?.apply(app_input).await;
        Ok(Self::convert_apply_result(app_result))
    }

    fn convert_apply_result(app_result: Result<ApplyOutput, ReplicaError>) -> ProtoApplyResult {
        let result = match app_result {
            Ok(output) => proto_apply_result::Result::Ok(ProtoApplySuccess {
                result: output.result.to_vec(),
            }),
            Err(e) => proto_apply_result::Result::Err(wire::error_to_proto(e)),
        };

        ProtoApplyResult { result: Some(result) }
    }

    async fn handle_apply_as_backup(&self, rpc_request: ProtoApplyAsBackupReq) -> Result<ProtoEmptyResult, Status> {
        let app_input = ApplyAsBackupInput {
            epoch: Epoch::new(rpc_request.epoch),
            index: Index::new(rpc_request.index),
            op: Bytes::from(rpc_request.op),
        };
        let app_result = self.replica()?.apply_as_backup(app_input).await;
        Ok(wire::empty_result_to_proto(app_result))
    }

    async fn handle_become_primary(&self, rpc_request: ProtoBecomePrimaryReq) -> Result<ProtoEmptyResult, Status> {
        let app_input = BecomePrimaryInput {
            epoch: Epoch::new(rpc_request.epoch),
            replicas: wire::addrs_from_proto(&rpc_request.replicas)?,
        };
        let app_result = self.replica()?.become_primary(app_input).await;
        Ok(wire::empty_result_to_proto(app_result))
    }

    async fn handle_get_state(&self, rpc_request: ProtoGetStateReq) -> Result<ProtoGetStateResult, Status> {
        let app_input = GetStateInput {
            epoch: Epoch::new(rpc_request.epoch),
        };
        let app_result = self.replica()?.get_state(app_input).await;
        Ok(Self::convert_get_state_result(app_result))
    }

    fn convert_get_state_result(app_result: Result<GetStateOutput, ReplicaError>) -> ProtoGetStateResult {
        let result = match app_result {
            Ok(output) => proto_get_state_result::Result::Ok(ProtoGetStateSuccess {
                state: output.state.to_vec(),
                next_index: output.next_index.as_u64(),
            }),
            Err(e) => proto_get_state_result::Result::Err(wire::error_to_proto(e)),
        };

        ProtoGetStateResult { result: Some(result) }
    }

    async fn handle_set_state(&self, rpc_request: ProtoSetStateReq) -> Result<ProtoEmptyResult, Status> {
        let app_input = SetStateInput {
            epoch: Epoch::new(rpc_request.epoch),
            state: Bytes::from(rpc_request.state),
            next_index: Index::new(rpc_request.next_index),
        };
        let app_result = self.replica()?.set_state(app_input).await;
        Ok(wire::empty_result_to_proto(app_result))
    }
}

#[async_trait::async_trait]
impl ReplicaService for ReplicaRpcServer {
    async fn apply(&self, rpc_request_wrapped: Request<ProtoApplyReq>) -> Result<Response<ProtoApplyResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_apply(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }

    async fn apply_as_backup(
        &self,
        rpc_request_wrapped: Request<ProtoApplyAsBackupReq>,
    ) -> Result<Response<ProtoEmptyResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_apply_as_backup(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }

    async fn become_primary(
        &self,
        rpc_request_wrapped: Request<ProtoBecomePrimaryReq>,
    ) -> Result<Response<ProtoEmptyResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_become_primary(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }

    async fn get_state(
        &self,
        rpc_request_wrapped: Request<ProtoGetStateReq>,
    ) -> Result<Response<ProtoGetStateResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_get_state(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }

    async fn set_state(
        &self,
        rpc_request_wrapped: Request<ProtoSetStateReq>,
    ) -> Result<Response<ProtoEmptyResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_set_state(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }
}
