use crate::kv::{encode_get, encode_put};
use crate::{ApplyInput, ConfigAuthority, ReplicaConnector, ReplicaError, ReplicaRpc};
use bytes::Bytes;
use std::sync::Arc;

/// KvClerk submits KV ops to a primary.
///
/// It does not retry or chase a new primary on `Stale`. Callers that see `Stale` should
/// `discover()` again, since a reconfiguration has most likely happened.
pub struct KvClerk {
    primary: Arc<dyn ReplicaRpc>,
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoverPrimaryError {
    #[error("No configuration has been written yet")]
    NoConfiguration,
    #[error(transparent)]
    Replica(#[from] ReplicaError),
}

impl KvClerk {
    pub fn new(primary: Arc<dyn ReplicaRpc>) -> Self {
        KvClerk { primary }
    }

    /// Connect to the primary of the latest configuration, which is always its first member.
    pub async fn discover(
        authority: &dyn ConfigAuthority,
        connector: &dyn ReplicaConnector,
    ) -> Result<Self, DiscoverPrimaryError> {
        let members = authority.get_config().await?;
        let primary = members.first().ok_or(DiscoverPrimaryError::NoConfiguration)?;

        Ok(Self::new(connector.connect(*primary)))
    }

    pub async fn put(&self, key: &[u8], value: &[u8]) -> Result<(), ReplicaError> {
        self.primary
            .apply(ApplyInput {
                op: encode_put(key, value),
            })
            .await
            .map(|_| ())
    }

    pub async fn get(&self, key: &[u8]) -> Result<Bytes, ReplicaError> {
        self.primary
            .apply(ApplyInput { op: encode_get(key) })
            .await
            .map(|output| output.result)
    }
}
