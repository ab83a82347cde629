use crate::commitlog::Index;
use crate::replica::Epoch;
use bytes::Bytes;
use std::net::SocketAddr;

/// The error taxonomy shared by every replica and configuration-authority call. Success is `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReplicaError {
    // Re-fetch the configuration and retry with a fresher epoch.
    #[error("Caller's epoch is stale")]
    Stale,

    #[error("Replica is not the primary")]
    NotPrimary,

    // A replication gap. Only a reconfiguration heals this; retrying the same call won't.
    #[error("Replication index does not match the next expected index")]
    OutOfOrder,

    #[error("Remote call timed out")]
    Timeout,

    #[error("Remote peer is disconnected or unavailable")]
    Disconnected,

    #[error("State snapshot could not be installed")]
    MalformedSnapshot,
}

impl ReplicaError {
    /// Transport-level failures say nothing about the callee's state and can always be retried.
    pub fn is_transport(&self) -> bool {
        matches!(self, ReplicaError::Timeout | ReplicaError::Disconnected)
    }
}

#[derive(Debug, Clone)]
pub struct ApplyInput {
    pub op: Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutput {
    pub result: Bytes,
}

#[derive(Debug, Clone)]
pub struct ApplyAsBackupInput {
    pub epoch: Epoch,
    // Index the op occupies in the primary's log.
    pub index: Index,
    pub op: Bytes,
}

#[derive(Debug, Clone)]
pub struct BecomePrimaryInput {
    pub epoch: Epoch,
    // The whole replica set, including the new primary itself.
    pub replicas: Vec<SocketAddr>,
}

#[derive(Debug, Clone)]
pub struct GetStateInput {
    pub epoch: Epoch,
}

#[derive(Debug, Clone)]
pub struct GetStateOutput {
    pub state: Bytes,
    pub next_index: Index,
}

#[derive(Debug, Clone)]
pub struct SetStateInput {
    pub epoch: Epoch,
    pub state: Bytes,
    pub next_index: Index,
}

/// A point-in-time view of a replica's protocol state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicaStatus {
    pub epoch: Epoch,
    pub next_index: Index,
    pub is_primary: bool,
    pub sealed: bool,
}
