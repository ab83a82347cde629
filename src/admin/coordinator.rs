use crate::config::ConfigAuthority;
use crate::replica::{
    scatter_gather, BecomePrimaryInput, Epoch, GetStateInput, GetStateOutput, ReplicaConnector, ReplicaError,
    SetStateInput,
};
use rand::Rng;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::time::Duration;

const RETRY_BACKOFF: Duration = Duration::from_millis(20);

/// Coordinator moves the system between replica sets.
///
/// Each attempt works under a fresh epoch from the authority, so a failed attempt is never resumed,
/// only retried from scratch. Concurrent coordinators are safe: replicas fence on the epoch and the
/// authority refuses stale configurations.
pub struct Coordinator {
    logger: slog::Logger,
    authority: Arc<dyn ConfigAuthority>,
    connector: Arc<dyn ReplicaConnector>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReconfigError {
    #[error("No servers given for the new configuration")]
    NoServers,
    #[error("The current configuration has no members to take state from")]
    EmptyOldConfig,
    #[error(transparent)]
    Replica(#[from] ReplicaError),
}

impl ReconfigError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReconfigError::Replica(e) if e.is_transport())
    }
}

impl Coordinator {
    pub fn new(
        logger: slog::Logger,
        authority: Arc<dyn ConfigAuthority>,
        connector: Arc<dyn ReplicaConnector>,
    ) -> Self {
        Coordinator {
            logger,
            authority,
            connector,
        }
    }

    /// Bootstrap: record `servers` as the first configuration and make `servers[0]` its primary.
    /// The servers are assumed to start out empty.
    pub async fn initialize_system(&self, servers: Vec<SocketAddr>) -> Result<Epoch, ReconfigError> {
        let primary = *servers.first().ok_or(ReconfigError::NoServers)?;

        let (epoch, _) = self.authority.allocate_epoch_and_config().await?;
        self.authority.write_config(epoch, servers.clone()).await?;
        self.connector
            .connect(primary)
            .become_primary(BecomePrimaryInput {
                epoch,
                replicas: servers,
            })
            .await?;

        slog::info!(self.logger, "Initialized system"; "epoch" => epoch.as_u64(), "primary" => %primary);
        Ok(epoch)
    }

    /// Migrate state and authority from the current configuration to `servers`, with `servers[0]`
    /// as the new primary. Returns the epoch of the new configuration.
    ///
    /// On failure nothing is rolled back. A failure before the configuration is written leaves
    /// the old configuration in place; a failure after leaves the new one without a primary. Either
    /// way, calling this again repairs it.
    pub async fn enter_new_config(&self, servers: Vec<SocketAddr>) -> Result<Epoch, ReconfigError> {
        let primary = *servers.first().ok_or(ReconfigError::NoServers)?;

        let (epoch, old_servers) = self.authority.allocate_epoch_and_config().await?;
        let logger = self.logger.new(slog::o!("epoch" => epoch.as_u64()));

        // Fences the donor into the new epoch, so it can no longer serve the old one.
        let handoff = self.fetch_state(&logger, epoch, &old_servers, &servers).await?;

        let calls = servers
            .iter()
            .map(|addr| {
                let clerk = self.connector.connect(*addr);
                let input = SetStateInput {
                    epoch,
                    state: handoff.state.clone(),
                    next_index: handoff.next_index,
                };
                async move { clerk.set_state(input).await }
            })
            .collect();
        scatter_gather(calls).await.map_err(|e| {
            slog::warn!(logger, "Failed to install state on new servers: {:?}", e);
            e
        })?;

        self.authority.write_config(epoch, servers.clone()).await?;

        self.connector
            .connect(primary)
            .become_primary(BecomePrimaryInput {
                epoch,
                replicas: servers.clone(),
            })
            .await?;

        slog::info!(logger, "Entered new configuration"; "members" => ?servers);
        Ok(epoch)
    }

    /// `enter_new_config()`, retried on transport failures up to `max_attempts` times in total.
    pub async fn enter_new_config_retrying(
        &self,
        servers: Vec<SocketAddr>,
        max_attempts: usize,
    ) -> Result<Epoch, ReconfigError> {
        let mut attempt = 1;
        loop {
            match self.enter_new_config(servers.clone()).await {
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    slog::info!(self.logger, "Reconfiguration attempt {} failed, retrying: {}", attempt, e);
                    attempt += 1;
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                result => return result,
            }
        }
    }

    // Any member of the old configuration will do. Members that are leaving go first, then the
    // rest; within each group start from a random one and move on past unreachable ones.
    async fn fetch_state(
        &self,
        logger: &slog::Logger,
        epoch: Epoch,
        old_servers: &[SocketAddr],
        new_servers: &[SocketAddr],
    ) -> Result<GetStateOutput, ReconfigError> {
        if old_servers.is_empty() {
            return Err(ReconfigError::EmptyOldConfig);
        }

        let start = rand::thread_rng().gen_range(0..old_servers.len());
        let mut last_error = ReplicaError::Disconnected;
        for donor in donor_order(old_servers, new_servers, start) {
            match self.connector.connect(donor).get_state(GetStateInput { epoch }).await {
                Ok(handoff) => {
                    slog::info!(
                        logger,
                        "Fetched state";
                        "donor" => %donor,
                        "next_index" => handoff.next_index.as_u64()
                    );
                    return Ok(handoff);
                }
                Err(e) if e.is_transport() => {
                    slog::warn!(logger, "Old member unreachable: {:?}", e; "donor" => %donor);
                    last_error = e;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(last_error.into())
    }
}

fn donor_order(old_servers: &[SocketAddr], new_servers: &[SocketAddr], start: usize) -> Vec<SocketAddr> {
    let (mut order, staying): (Vec<_>, Vec<_>) = (0..old_servers.len())
        .map(|offset| old_servers[(start + offset) % old_servers.len()])
        .partition(|addr| !new_servers.contains(addr));
    order.extend(staying);
    order
}
