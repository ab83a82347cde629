use crate::config::{ConfigAuthority, Lease};
use crate::grpc::config_service_client::ConfigServiceClient;
use crate::grpc::{ProtoAllocateEpochReq, ProtoGetConfigReq, ProtoGetLeaseReq, ProtoWriteConfigReq};
use crate::replica::{Epoch, ReplicaError};
use crate::server::{addrs_from_proto, addrs_to_proto, empty_result_from_proto, PeerChannel};
use chrono::{TimeZone, Utc};
use std::convert::TryFrom;
use std::net::SocketAddr;
use tokio::time::Duration;

const RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// GrpcConfigClient talks to a remote configuration authority.
///
/// Reads and epoch allocation are retried until the authority answers. `write_config()` and
/// `get_lease()` are not: their callers need to hear about transport failures.
pub struct GrpcConfigClient {
    channel: PeerChannel,
}

impl GrpcConfigClient {
    pub fn new(logger: slog::Logger, addr: SocketAddr, rpc_timeout: Duration) -> Self {
        GrpcConfigClient {
            channel: PeerChannel::new(logger, addr, rpc_timeout),
        }
    }

    async fn retry_transport_errors<T, C, Fut>(&self, mut call: C) -> Result<T, ReplicaError>
    where
        C: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ReplicaError>>,
    {
        loop {
            match call().await {
                Err(e) if e.is_transport() => {
                    slog::debug!(self.channel.logger(), "Config authority unreachable, retrying: {:?}", e);
                    tokio::time::sleep(RETRY_INTERVAL).await;
                }
                result => return result,
            }
        }
    }
}

#[async_trait::async_trait]
impl ConfigAuthority for GrpcConfigClient {
    async fn allocate_epoch_and_config(&self) -> Result<(Epoch, Vec<SocketAddr>), ReplicaError> {
        let reply = self
            .retry_transport_errors(|| {
                self.channel.invoke(|channel| async move {
                    let mut client = ConfigServiceClient::new(channel);
                    client.allocate_epoch_and_config(ProtoAllocateEpochReq {}).await
                })
            })
            .await?;

        let members = parse_members(&reply.members)?;
        Ok((Epoch::new(reply.epoch), members))
    }

    async fn write_config(&self, epoch: Epoch, members: Vec<SocketAddr>) -> Result<(), ReplicaError> {
        let request = ProtoWriteConfigReq {
            epoch: epoch.as_u64(),
            members: addrs_to_proto(&members),
        };
        let reply = self
            .channel
            .invoke(|channel| async move {
                let mut client = ConfigServiceClient::new(channel);
                client.write_config(request).await
            })
            .await?;

        empty_result_from_proto(reply)
    }

    async fn get_config(&self) -> Result<Vec<SocketAddr>, ReplicaError> {
        let reply = self
            .retry_transport_errors(|| {
                self.channel.invoke(|channel| async move {
                    let mut client = ConfigServiceClient::new(channel);
                    client.get_config(ProtoGetConfigReq {}).await
                })
            })
            .await?;

        parse_members(&reply.members)
    }

    async fn get_lease(&self, epoch: Epoch) -> Result<Lease, ReplicaError> {
        let request = ProtoGetLeaseReq { epoch: epoch.as_u64() };
        let reply = self
            .channel
            .invoke(|channel| async move {
                let mut client = ConfigServiceClient::new(channel);
                client.get_lease(request).await
            })
            .await?;

        if !reply.granted {
            return Ok(Lease::denied());
        }

        let expires_at = i64::try_from(reply.expires_at_unix_millis)
            .ok()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single());
        Ok(Lease {
            granted: expires_at.is_some(),
            expires_at,
        })
    }
}

// The authority only ever stores addresses it parsed itself, so a bad one means it's broken.
fn parse_members(members: &[String]) -> Result<Vec<SocketAddr>, ReplicaError> {
    addrs_from_proto(members).map_err(|_| ReplicaError::Disconnected)
}
