use crate::replica::{Epoch, ReplicaError};
use chrono::{DateTime, Utc};
use std::net::SocketAddr;

/// ConfigAuthority is the source of truth for epochs and replica-set membership.
///
/// Configurations are append-only by epoch: once a configuration exists for some epoch, writes for
/// that epoch or any earlier one are refused.
#[async_trait::async_trait]
pub trait ConfigAuthority: Send + Sync {
    /// Allocate an epoch no one has been given before, along with the latest configuration.
    async fn allocate_epoch_and_config(&self) -> Result<(Epoch, Vec<SocketAddr>), ReplicaError>;

    /// Fails `Stale` if a configuration for an epoch >= `epoch` already exists.
    async fn write_config(&self, epoch: Epoch, members: Vec<SocketAddr>) -> Result<(), ReplicaError>;

    /// The latest configuration. Its first member is the primary.
    async fn get_config(&self) -> Result<Vec<SocketAddr>, ReplicaError>;

    async fn get_lease(&self, epoch: Epoch) -> Result<Lease, ReplicaError>;
}

/// A time-bounded grant to act as primary for one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lease {
    pub granted: bool,
    // A conservative guess. `None` when not granted.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Lease {
    pub fn denied() -> Self {
        Lease {
            granted: false,
            expires_at: None,
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => self.granted && now < expires_at,
            None => false,
        }
    }
}
