use crate::commitlog::Index;
use crate::grpc::replica_service_client::ReplicaServiceClient;
use crate::grpc::{
    proto_apply_result, proto_get_state_result, ProtoApplyAsBackupReq, ProtoApplyReq, ProtoBecomePrimaryReq,
    ProtoGetStateReq, ProtoSetStateReq,
};
use crate::replica::replica_api::{
    ApplyAsBackupInput, ApplyInput, ApplyOutput, BecomePrimaryInput, GetStateInput, GetStateOutput, ReplicaError,
    SetStateInput,
};
use crate::replica::rpc::{ReplicaConnector, ReplicaRpc};
use crate::server::{addrs_to_proto, empty_result_from_proto, error_from_proto, PeerChannel};
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::time::Duration;

/// GrpcReplicaClient calls a remote replica over gRPC.
pub struct GrpcReplicaClient {
    channel: PeerChannel,
}

impl GrpcReplicaClient {
    pub fn new(logger: slog::Logger, addr: SocketAddr, rpc_timeout: Duration) -> Self {
        GrpcReplicaClient {
            channel: PeerChannel::new(logger, addr, rpc_timeout),
        }
    }
}

#[async_trait::async_trait]
impl ReplicaRpc for GrpcReplicaClient {
    async fn apply(&self, input: ApplyInput) -> Result<ApplyOutput, ReplicaError> {
        let request = ProtoApplyReq { op: input.op.to_vec() };
        let reply = self
            .channel
            .invoke(|channel| async move {
                let mut client = ReplicaServiceClient::new(channel);
                client.apply(request).await
            })
            .await?;

        match reply.result {
            Some(proto_apply_result::Result::Ok(ok)) => Ok(ApplyOutput {
                result: Bytes::from(ok.result),
            }),
            Some(proto_apply_result::Result::Err(e)) => Err(error_from_proto(e)),
            None => Err(ReplicaError::Disconnected),
        }
    }

    async fn apply_as_backup(&self, input: ApplyAsBackupInput) -> Result<(), ReplicaError> {
        let request = ProtoApplyAsBackupReq {
            epoch: input.epoch.as_u64(),
            index: input.index.as_u64(),
            op: input.op.to_vec(),
        };
        let reply = self
            .channel
            .invoke(|channel| async move {
                let mut client = ReplicaServiceClient::new(channel);
                client.apply_as_backup(request).await
            })
            .await?;

        empty_result_from_proto(reply)
    }

    async fn become_primary(&self, input: BecomePrimaryInput) -> Result<(), ReplicaError> {
        let request = ProtoBecomePrimaryReq {
            epoch: input.epoch.as_u64(),
            replicas: addrs_to_proto(&input.replicas),
        };
        let reply = self
            .channel
            .invoke(|channel| async move {
                let mut client = ReplicaServiceClient::new(channel);
                client.become_primary(request).await
            })
            .await?;

        empty_result_from_proto(reply)
    }

    async fn get_state(&self, input: GetStateInput) -> Result<GetStateOutput, ReplicaError> {
        let request = ProtoGetStateReq {
            epoch: input.epoch.as_u64(),
        };
        let reply = self
            .channel
            .invoke(|channel| async move {
                let mut client = ReplicaServiceClient::new(channel);
                client.get_state(request).await
            })
            .await?;

        match reply.result {
            Some(proto_get_state_result::Result::Ok(ok)) => Ok(GetStateOutput {
                state: Bytes::from(ok.state),
                next_index: Index::new(ok.next_index),
            }),
            Some(proto_get_state_result::Result::Err(e)) => Err(error_from_proto(e)),
            None => Err(ReplicaError::Disconnected),
        }
    }

    async fn set_state(&self, input: SetStateInput) -> Result<(), ReplicaError> {
        let request = ProtoSetStateReq {
            epoch: input.epoch.as_u64(),
            state: input.state.to_vec(),
            next_index: input.next_index.as_u64(),
        };
        let reply = self
            .channel
            .invoke(|channel| async move {
                let mut client = ReplicaServiceClient::new(channel);
                client.set_state(request).await
            })
            .await?;

        empty_result_from_proto(reply)
    }
}

/// GrpcConnector hands out `GrpcReplicaClient`s.
#[derive(Clone)]
pub struct GrpcConnector {
    logger: slog::Logger,
    rpc_timeout: Duration,
}

impl GrpcConnector {
    pub fn new(logger: slog::Logger, rpc_timeout: Duration) -> Self {
        GrpcConnector { logger, rpc_timeout }
    }
}

impl ReplicaConnector for GrpcConnector {
    fn connect(&self, addr: SocketAddr) -> Arc<dyn ReplicaRpc> {
        Arc::new(GrpcReplicaClient::new(self.logger.clone(), addr, self.rpc_timeout))
    }
}
