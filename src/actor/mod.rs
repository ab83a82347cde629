use crate::api::StateMachine;
use crate::commitlog::DurableFile;
use crate::replica::{
    scatter_gather, ApplyAsBackupInput, ApplyInput, ApplyOutput, BecomePrimaryInput, GetStateInput, GetStateOutput,
    PendingReplication, Replica, ReplicaError, ReplicaFailure, ReplicaRpc, ReplicaStatus, SetStateInput,
};
use crate::server::RpcServerShutdownHandle;
use std::io;
use tokio::sync::{mpsc, oneshot};

pub(crate) fn create<F, M>(
    logger: slog::Logger,
    queue_size: usize,
    replica: Replica<F, M>,
    server_shutdown_handle: Option<RpcServerShutdownHandle>,
) -> (ActorClient, ReplicaActor<F, M>)
where
    F: DurableFile,
    M: StateMachine,
{
    let (tx, rx) = mpsc::channel(queue_size);
    let client = ActorClient {
        logger: logger.clone(),
        sender: tx,
    };
    let actor = ReplicaActor {
        logger,
        receiver: rx,
        replica,
        _server_shutdown_handle: server_shutdown_handle,
    };

    (client, actor)
}

// Every state transition of a replica is one event. The actor handles them one at a time, which
// is what gives the replica its mutual exclusion.
#[derive(Debug)]
enum Event {
    // Primary: log and apply locally, then hand replication back to the caller.
    // Backup: reject.
    Apply(ApplyInput, Callback<PendingReplication>),
    ApplyAsBackup(ApplyAsBackupInput, Callback<()>),
    BecomePrimary(BecomePrimaryInput, Callback<()>),
    // Seals the log.
    GetState(GetStateInput, Callback<GetStateOutput>),
    SetState(SetStateInput, Callback<()>),
    Status(Callback<ReplicaStatus>),
    CompactLog(Callback<()>),
}

#[derive(Debug)]
struct Callback<O>(oneshot::Sender<Result<O, ReplicaError>>);

impl<O> Callback<O> {
    fn send(self, message: Result<O, ReplicaError>) {
        let _ = self.0.send(message);
    }

    // A fatal failure drops the callback so the caller observes a dead replica.
    fn reply(self, result: Result<O, ReplicaFailure>) -> Result<(), io::Error> {
        match result {
            Ok(output) => self.send(Ok(output)),
            Err(ReplicaFailure::Rejected(e)) => self.send(Err(e)),
            Err(ReplicaFailure::Fatal(e)) => return Err(e),
        }

        Ok(())
    }
}

/// ActorClient is the handle for calling into a local replica.
#[derive(Clone)]
pub struct ActorClient {
    logger: slog::Logger,
    sender: mpsc::Sender<Event>,
}

/// WeakActorClient does not keep the replica alive.
#[derive(Clone)]
pub struct WeakActorClient {
    logger: slog::Logger,
    sender: mpsc::WeakSender<Event>,
}

impl ActorClient {
    pub fn weak(&self) -> WeakActorClient {
        WeakActorClient {
            logger: self.logger.clone(),
            sender: self.sender.downgrade(),
        }
    }

    pub async fn status(&self) -> Result<ReplicaStatus, ReplicaError> {
        self.call(Event::Status).await
    }

    pub async fn compact_log(&self) -> Result<(), ReplicaError> {
        self.call(Event::CompactLog).await
    }

    async fn call<O>(&self, event: impl FnOnce(Callback<O>) -> Event) -> Result<O, ReplicaError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(event(Callback(tx)))
            .await
            .map_err(|_| ReplicaError::Disconnected)?;

        rx.await.unwrap_or(Err(ReplicaError::Disconnected))
    }

    async fn replicate(&self, pending: PendingReplication) -> Result<(), ReplicaError> {
        let PendingReplication { request, backups, .. } = pending;

        let calls = backups
            .into_iter()
            .map(|backup| {
                let request = request.clone();
                let logger = self.logger.clone();
                async move {
                    let result = backup.clerk.apply_as_backup(request).await;
                    if let Err(e) = result {
                        slog::warn!(logger, "Backup did not apply op: {:?}", e; "backup" => %backup.addr);
                    }
                    result
                }
            })
            .collect();

        scatter_gather(calls).await
    }
}

impl WeakActorClient {
    pub fn upgrade(&self) -> Option<ActorClient> {
        self.sender.upgrade().map(|sender| ActorClient {
            logger: self.logger.clone(),
            sender,
        })
    }
}

#[async_trait::async_trait]
impl ReplicaRpc for ActorClient {
    /// The op is already durable and applied locally by the time backups are contacted, and stays
    /// that way even if replication fails.
    async fn apply(&self, input: ApplyInput) -> Result<ApplyOutput, ReplicaError> {
        let pending = self.call(|callback| Event::Apply(input, callback)).await?;
        let result = pending.result.clone();

        self.replicate(pending).await?;
        Ok(ApplyOutput { result })
    }

    async fn apply_as_backup(&self, input: ApplyAsBackupInput) -> Result<(), ReplicaError> {
        self.call(|callback| Event::ApplyAsBackup(input, callback)).await
    }

    async fn become_primary(&self, input: BecomePrimaryInput) -> Result<(), ReplicaError> {
        self.call(|callback| Event::BecomePrimary(input, callback)).await
    }

    async fn get_state(&self, input: GetStateInput) -> Result<GetStateOutput, ReplicaError> {
        self.call(|callback| Event::GetState(input, callback)).await
    }

    async fn set_state(&self, input: SetStateInput) -> Result<(), ReplicaError> {
        self.call(|callback| Event::SetState(input, callback)).await
    }
}

/// ReplicaActor is replica logic in actor model.
pub(crate) struct ReplicaActor<F, M>
where
    F: DurableFile,
    M: StateMachine,
{
    logger: slog::Logger,
    receiver: mpsc::Receiver<Event>,
    replica: Replica<F, M>,
    // Dropped when the event loop exits, which stops the replica's RPC server.
    _server_shutdown_handle: Option<RpcServerShutdownHandle>,
}

impl<F, M> ReplicaActor<F, M>
where
    F: DurableFile,
    M: StateMachine,
{
    pub async fn run_event_loop(mut self) {
        while let Some(event) = self.receiver.recv().await {
            if let Err(e) = self.handle_event(event) {
                slog::crit!(self.logger, "Durable log failure. Replica is stopping: {:?}", e);
                break;
            }
        }

        slog::info!(self.logger, "Replica event loop has exited");
    }

    // This must NOT be async. Any network work happens on the caller's task.
    fn handle_event(&mut self, event: Event) -> Result<(), io::Error> {
        match event {
            Event::Apply(input, callback) => callback.reply(self.replica.handle_apply(input)),
            Event::ApplyAsBackup(input, callback) => callback.reply(self.replica.handle_apply_as_backup(input)),
            Event::BecomePrimary(input, callback) => callback.reply(self.replica.handle_become_primary(input)),
            Event::GetState(input, callback) => callback.reply(self.replica.handle_get_state(input)),
            Event::SetState(input, callback) => callback.reply(self.replica.handle_set_state(input)),
            Event::Status(callback) => {
                callback.send(Ok(self.replica.status()));
                Ok(())
            }
            Event::CompactLog(callback) => callback.reply(self.replica.compact_log()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitlog::DurableStateMachine;
    use crate::kv::{encode_get, encode_put, KvStateMachine};
    use crate::replica::{addr, test_logger, Epoch, LocalNetwork, ReplicaConfig};
    use bytes::Bytes;
    use std::sync::Arc;

    // Accepts the initial rewrite but fails every append.
    struct FullDisk;

    impl DurableFile for FullDisk {
        fn read_all(&self) -> io::Result<Vec<u8>> {
            Ok(Vec::new())
        }

        fn atomic_append(&mut self, _: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn write_all(&mut self, _: &[u8]) -> io::Result<()> {
            Ok(())
        }
    }

    async fn become_primary(client: &ActorClient, epoch: u64, replicas: Vec<std::net::SocketAddr>) {
        client
            .become_primary(BecomePrimaryInput {
                epoch: Epoch::new(epoch),
                replicas,
            })
            .await
            .unwrap();
    }

    fn put(key: &str, value: &str) -> ApplyInput {
        ApplyInput {
            op: encode_put(key.as_bytes(), value.as_bytes()),
        }
    }

    #[tokio::test]
    async fn unreachable_backup_fails_apply_after_local_effect() {
        let network = LocalNetwork::new();
        let primary = network.spawn_replica(addr(1));
        network.spawn_replica(addr(2));
        become_primary(&primary, 1, vec![addr(1), addr(2)]).await;
        network.partition(addr(2));

        assert_eq!(primary.apply(put("k", "v")).await, Err(ReplicaError::Disconnected));

        // All-or-nothing replication doesn't undo the local apply.
        let status = primary.status().await.unwrap();
        assert_eq!(status.next_index.as_u64(), 1);
        network.heal(addr(2));
        // ...and the gap it left on the backup can't be papered over.
        assert_eq!(primary.apply(put("k", "v2")).await, Err(ReplicaError::OutOfOrder));
    }

    #[tokio::test]
    async fn acknowledged_ops_survive_restart() {
        let network = LocalNetwork::new();
        let primary = network.spawn_replica(addr(1));
        become_primary(&primary, 1, vec![addr(1)]).await;
        for i in 0..5 {
            primary.apply(put(&format!("k{}", i), &i.to_string())).await.unwrap();
        }
        drop(primary);

        let recovered = network.restart(addr(1));
        let status = recovered.status().await.unwrap();
        assert_eq!(status.epoch, Epoch::new(1));
        assert_eq!(status.next_index.as_u64(), 5);
        // Role is not durable.
        assert!(!status.is_primary);

        become_primary(&recovered, 1, vec![addr(1)]).await;
        let output = recovered
            .apply(ApplyInput { op: encode_get(b"k3") })
            .await
            .unwrap();
        assert_eq!(output.result, Bytes::from("3"));
    }

    #[tokio::test]
    async fn compacted_log_recovers_to_the_same_position() {
        let network = LocalNetwork::new();
        let primary = network.spawn_replica(addr(1));
        become_primary(&primary, 1, vec![addr(1)]).await;
        primary.apply(put("k", "v")).await.unwrap();
        primary.compact_log().await.unwrap();
        drop(primary);

        let recovered = network.restart(addr(1));
        let status = recovered.status().await.unwrap();
        assert_eq!(status.next_index.as_u64(), 1);
    }

    #[tokio::test]
    async fn durable_log_failure_stops_the_replica() {
        let logger = test_logger();
        let log = DurableStateMachine::recover(logger.clone(), FullDisk, KvStateMachine::new()).unwrap();
        let replica = Replica::new(ReplicaConfig {
            logger: logger.clone(),
            my_addr: addr(1),
            log,
            connector: Arc::new(LocalNetwork::new()),
        });
        let (client, actor) = create(logger, 4, replica, None);
        let event_loop = tokio::spawn(actor.run_event_loop());
        become_primary(&client, 0, vec![addr(1)]).await;

        assert_eq!(client.apply(put("k", "v")).await, Err(ReplicaError::Disconnected));

        event_loop.await.unwrap();
        assert_eq!(client.status().await, Err(ReplicaError::Disconnected));
    }

    #[tokio::test]
    async fn weak_client_does_not_keep_replica_alive() {
        let network = LocalNetwork::new();
        let client = network.spawn_replica(addr(1));
        let weak = client.weak();
        assert!(weak.upgrade().is_some());

        network.crash(addr(1));
        drop(client);

        assert!(weak.upgrade().is_none());
    }
}
