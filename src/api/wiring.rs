use crate::actor::{self, ActorClient};
use crate::api::options::ReplicaOptionsValidated;
use crate::commitlog::{DiskFile, DurableStateMachine, LogRecoveryError};
use crate::replica::{
    ApplyAsBackupInput, ApplyInput, ApplyOutput, BecomePrimaryInput, GetStateInput, GetStateOutput, GrpcConnector,
    Replica, ReplicaConfig, ReplicaError, ReplicaRpc, ReplicaStatus, SetStateInput,
};
use crate::server::{self, ReplicaRpcServer};
use crate::{ReplicaOptions, StateMachine};
use std::convert::TryFrom;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

pub struct ReplicaServerConfig<M: StateMachine> {
    // Where this replica's gRPC server listens. Peers and the admin refer to the replica by it.
    pub my_addr: SocketAddr,
    // The replica's single durable log file. Created if missing.
    pub log_file_path: PathBuf,
    // Starting state, used only if the log file is empty.
    pub state_machine: M,
    pub info_logger: slog::Logger,
    pub options: ReplicaOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum ReplicaCreationError {
    #[error("Illegal options for configuring replica: {0}")]
    IllegalOptions(String),
    #[error("Log initialization failure")]
    LogInitialization(#[from] LogRecoveryError),
}

/// ReplicaHandle is the owner of a running replica. Dropping it (or calling `shutdown()`) stops
/// the replica and its RPC server.
pub struct ReplicaHandle {
    addr: SocketAddr,
    local_replica: ActorClient,
}

pub async fn try_create_replica<M: StateMachine>(
    config: ReplicaServerConfig<M>,
) -> Result<ReplicaHandle, ReplicaCreationError> {
    let logger = config
        .info_logger
        .new(slog::o!("replica" => config.my_addr.to_string()));

    let options = ReplicaOptionsValidated::try_from(config.options)
        .map_err(|e| ReplicaCreationError::IllegalOptions(e.to_string()))?;

    let file = DiskFile::open(&config.log_file_path).map_err(LogRecoveryError::from)?;
    let log = DurableStateMachine::recover(logger.clone(), file, config.state_machine)?;

    let replica = Replica::new(ReplicaConfig {
        logger: logger.clone(),
        my_addr: config.my_addr,
        log,
        connector: Arc::new(GrpcConnector::new(logger.clone(), options.rpc_timeout)),
    });

    let (server_shutdown_handle, server_shutdown_signal) = server::shutdown_signal();
    let (actor_client, replica_actor) =
        actor::create(logger.clone(), options.actor_queue_size, replica, Some(server_shutdown_handle));
    tokio::spawn(replica_actor.run_event_loop());

    let replica_server = ReplicaRpcServer::new(logger, actor_client.weak());
    tokio::spawn(replica_server.run(config.my_addr, server_shutdown_signal));

    Ok(ReplicaHandle {
        addr: config.my_addr,
        local_replica: actor_client,
    })
}

impl ReplicaHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn status(&self) -> Result<ReplicaStatus, ReplicaError> {
        self.local_replica.status().await
    }

    /// Rewrite the log as a single snapshot. Not crash atomic.
    pub async fn compact_log(&self) -> Result<(), ReplicaError> {
        self.local_replica.compact_log().await
    }

    pub fn shutdown(self) {
        // Drop
    }
}

#[async_trait::async_trait]
impl ReplicaRpc for ReplicaHandle {
    async fn apply(&self, input: ApplyInput) -> Result<ApplyOutput, ReplicaError> {
        self.local_replica.apply(input).await
    }

    async fn apply_as_backup(&self, input: ApplyAsBackupInput) -> Result<(), ReplicaError> {
        self.local_replica.apply_as_backup(input).await
    }

    async fn become_primary(&self, input: BecomePrimaryInput) -> Result<(), ReplicaError> {
        self.local_replica.become_primary(input).await
    }

    async fn get_state(&self, input: GetStateInput) -> Result<GetStateOutput, ReplicaError> {
        self.local_replica.get_state(input).await
    }

    async fn set_state(&self, input: SetStateInput) -> Result<(), ReplicaError> {
        self.local_replica.set_state(input).await
    }
}
