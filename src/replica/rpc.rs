use crate::replica::replica_api::{
    ApplyAsBackupInput, ApplyInput, ApplyOutput, BecomePrimaryInput, GetStateInput, GetStateOutput, ReplicaError,
    SetStateInput,
};
use std::net::SocketAddr;
use std::sync::Arc;

/// ReplicaRpc is the capability to invoke a replica's operations, wherever the replica is.
///
/// A call blocks the calling task until the replica replies, or the transport gives up with
/// `Timeout` or `Disconnected`. Implementations never retry on their own.
#[async_trait::async_trait]
pub trait ReplicaRpc: Send + Sync {
    /// Submit a new op to a primary. Succeeds only once every backup has applied it.
    async fn apply(&self, input: ApplyInput) -> Result<ApplyOutput, ReplicaError>;

    async fn apply_as_backup(&self, input: ApplyAsBackupInput) -> Result<(), ReplicaError>;

    async fn become_primary(&self, input: BecomePrimaryInput) -> Result<(), ReplicaError>;

    async fn get_state(&self, input: GetStateInput) -> Result<GetStateOutput, ReplicaError>;

    async fn set_state(&self, input: SetStateInput) -> Result<(), ReplicaError>;
}

/// ReplicaConnector hands out `ReplicaRpc` handles by address. Connecting must not block; any
/// actual connection work is deferred to the first call.
pub trait ReplicaConnector: Send + Sync {
    fn connect(&self, addr: SocketAddr) -> Arc<dyn ReplicaRpc>;
}
