use crate::config::{ConfigAuthority, Lease};
use crate::replica::{Epoch, ReplicaError};
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::{Mutex, MutexGuard};
use tokio::time::Duration;

const DEFAULT_LEASE_DURATION: Duration = Duration::from_secs(1);

/// MemoryConfigAuthority is an in-process configuration authority. It is not durable, so it's
/// meant for tests, demos, and a single long-lived config server process.
pub struct MemoryConfigAuthority {
    logger: slog::Logger,
    lease_duration: Duration,
    state: Mutex<AuthorityState>,
}

struct AuthorityState {
    last_allocated: Epoch,
    config_epoch: Epoch,
    members: Vec<SocketAddr>,
}

impl MemoryConfigAuthority {
    pub fn new(logger: slog::Logger) -> Self {
        Self::with_lease_duration(logger, DEFAULT_LEASE_DURATION)
    }

    pub fn with_lease_duration(logger: slog::Logger, lease_duration: Duration) -> Self {
        MemoryConfigAuthority {
            logger,
            lease_duration,
            state: Mutex::new(AuthorityState {
                last_allocated: Epoch::new(0),
                config_epoch: Epoch::new(0),
                members: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, AuthorityState> {
        // Nothing panics while holding the lock, so a poisoned lock still holds consistent state.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl ConfigAuthority for MemoryConfigAuthority {
    async fn allocate_epoch_and_config(&self) -> Result<(Epoch, Vec<SocketAddr>), ReplicaError> {
        let mut state = self.state();
        state.last_allocated = Epoch::new(state.last_allocated.as_u64() + 1);

        slog::debug!(self.logger, "Allocated epoch {}", state.last_allocated);
        Ok((state.last_allocated, state.members.clone()))
    }

    async fn write_config(&self, epoch: Epoch, members: Vec<SocketAddr>) -> Result<(), ReplicaError> {
        let mut state = self.state();
        if state.config_epoch >= epoch {
            slog::info!(
                self.logger,
                "Refusing stale configuration";
                "epoch" => epoch.as_u64(),
                "config_epoch" => state.config_epoch.as_u64()
            );
            return Err(ReplicaError::Stale);
        }

        slog::info!(self.logger, "Wrote configuration"; "epoch" => epoch.as_u64(), "members" => ?members);
        state.config_epoch = epoch;
        state.members = members;
        Ok(())
    }

    async fn get_config(&self) -> Result<Vec<SocketAddr>, ReplicaError> {
        Ok(self.state().members.clone())
    }

    async fn get_lease(&self, epoch: Epoch) -> Result<Lease, ReplicaError> {
        let state = self.state();
        if state.members.is_empty() || state.config_epoch != epoch {
            return Ok(Lease::denied());
        }

        let expires_at = chrono::Duration::from_std(self.lease_duration)
            .ok()
            .and_then(|lease_duration| Utc::now().checked_add_signed(lease_duration));

        Ok(Lease {
            granted: expires_at.is_some(),
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replica::{addr, test_logger};

    #[tokio::test]
    async fn allocated_epochs_are_unique_and_increasing() {
        let authority = MemoryConfigAuthority::new(test_logger());

        let (e1, members) = authority.allocate_epoch_and_config().await.unwrap();
        let (e2, _) = authority.allocate_epoch_and_config().await.unwrap();

        assert!(members.is_empty());
        assert!(e2 > e1);
        assert!(e1 > Epoch::new(0));
    }

    #[tokio::test]
    async fn write_config_refuses_equal_and_older_epochs() {
        let authority = MemoryConfigAuthority::new(test_logger());
        authority.write_config(Epoch::new(3), vec![addr(1)]).await.unwrap();

        assert_eq!(
            authority.write_config(Epoch::new(3), vec![addr(2)]).await,
            Err(ReplicaError::Stale)
        );
        assert_eq!(
            authority.write_config(Epoch::new(2), vec![addr(2)]).await,
            Err(ReplicaError::Stale)
        );
        assert_eq!(authority.get_config().await.unwrap(), vec![addr(1)]);

        authority.write_config(Epoch::new(4), vec![addr(2), addr(3)]).await.unwrap();
        assert_eq!(authority.get_config().await.unwrap(), vec![addr(2), addr(3)]);
        let (_, members) = authority.allocate_epoch_and_config().await.unwrap();
        assert_eq!(members, vec![addr(2), addr(3)]);
    }

    #[tokio::test]
    async fn lease_only_for_the_current_epoch() {
        let authority = MemoryConfigAuthority::with_lease_duration(test_logger(), Duration::from_millis(200));
        assert_eq!(authority.get_lease(Epoch::new(0)).await.unwrap(), Lease::denied());

        authority.write_config(Epoch::new(2), vec![addr(1)]).await.unwrap();
        let lease = authority.get_lease(Epoch::new(2)).await.unwrap();
        assert!(lease.is_valid_at(Utc::now()));
        assert!(!lease.is_valid_at(Utc::now() + chrono::Duration::milliseconds(500)));

        authority.write_config(Epoch::new(3), vec![addr(2)]).await.unwrap();
        assert!(!authority.get_lease(Epoch::new(2)).await.unwrap().granted);
    }
}
