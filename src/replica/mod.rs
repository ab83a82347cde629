mod epoch;
mod fan_out;
mod peer_client;
mod replica;
mod replica_api;
mod rpc;
#[cfg(test)]
mod test_utils;

pub use epoch::Epoch;
pub use peer_client::GrpcConnector;
pub use peer_client::GrpcReplicaClient;
pub use replica_api::ApplyAsBackupInput;
pub use replica_api::ApplyInput;
pub use replica_api::ApplyOutput;
pub use replica_api::BecomePrimaryInput;
pub use replica_api::GetStateInput;
pub use replica_api::GetStateOutput;
pub use replica_api::ReplicaError;
pub use replica_api::ReplicaStatus;
pub use replica_api::SetStateInput;
pub use rpc::ReplicaConnector;
pub use rpc::ReplicaRpc;

pub(crate) use fan_out::scatter_gather;
pub(crate) use replica::PendingReplication;
pub(crate) use replica::Replica;
pub(crate) use replica::ReplicaConfig;
pub(crate) use replica::ReplicaFailure;

#[cfg(test)]
pub(crate) use test_utils::{addr, test_logger, LocalNetwork};
