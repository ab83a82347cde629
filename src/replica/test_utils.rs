use crate::actor::{self, ActorClient};
use crate::commitlog::{DurableStateMachine, InMemoryFile};
use crate::kv::KvStateMachine;
use crate::replica::{
    ApplyAsBackupInput, ApplyInput, ApplyOutput, BecomePrimaryInput, GetStateInput, GetStateOutput, Replica,
    ReplicaConfig, ReplicaConnector, ReplicaError, ReplicaRpc, SetStateInput,
};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

pub(crate) fn test_logger() -> slog::Logger {
    slog::Logger::root(slog::Discard, slog::o!())
}

pub(crate) fn addr(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

/// LocalNetwork connects in-process replicas to each other without sockets. Replicas can be
/// partitioned away (calls to them fail `Disconnected`) or crashed and recovered from their file.
#[derive(Clone, Default)]
pub(crate) struct LocalNetwork {
    inner: Arc<Mutex<NetworkState>>,
}

#[derive(Default)]
struct NetworkState {
    replicas: HashMap<SocketAddr, ActorClient>,
    files: HashMap<SocketAddr, InMemoryFile>,
    partitioned: HashSet<SocketAddr>,
}

impl LocalNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a replica at `addr` backed by a fresh empty file.
    pub fn spawn_replica(&self, addr: SocketAddr) -> ActorClient {
        self.spawn_with_file(addr, InMemoryFile::new())
    }

    /// Drop the replica at `addr` and start it again from what it had on disk. Callers must drop
    /// handles to the old instance, since it shares the file with the new one.
    pub fn restart(&self, addr: SocketAddr) -> ActorClient {
        let file = {
            let mut state = self.inner.lock().unwrap();
            state.replicas.remove(&addr);
            state.files.get(&addr).cloned().expect("unknown replica")
        };

        self.spawn_with_file(addr, file)
    }

    /// The local handle of a running replica, bypassing partitions.
    pub fn spawned(&self, addr: SocketAddr) -> ActorClient {
        self.inner.lock().unwrap().replicas.get(&addr).cloned().expect("replica not running")
    }

    pub fn crash(&self, addr: SocketAddr) {
        self.inner.lock().unwrap().replicas.remove(&addr);
    }

    pub fn partition(&self, addr: SocketAddr) {
        self.inner.lock().unwrap().partitioned.insert(addr);
    }

    pub fn heal(&self, addr: SocketAddr) {
        self.inner.lock().unwrap().partitioned.remove(&addr);
    }

    fn spawn_with_file(&self, addr: SocketAddr, file: InMemoryFile) -> ActorClient {
        let logger = test_logger();
        let log = DurableStateMachine::recover(logger.clone(), file.clone(), KvStateMachine::new()).unwrap();
        let replica = Replica::new(ReplicaConfig {
            logger: logger.clone(),
            my_addr: addr,
            log,
            connector: Arc::new(self.clone()),
        });
        let (client, actor) = actor::create(logger, 16, replica, None);
        tokio::spawn(actor.run_event_loop());

        let mut state = self.inner.lock().unwrap();
        state.replicas.insert(addr, client.clone());
        state.files.insert(addr, file);
        client
    }

    fn reach(&self, addr: SocketAddr) -> Result<ActorClient, ReplicaError> {
        let state = self.inner.lock().unwrap();
        if state.partitioned.contains(&addr) {
            return Err(ReplicaError::Disconnected);
        }

        state.replicas.get(&addr).cloned().ok_or(ReplicaError::Disconnected)
    }
}

impl ReplicaConnector for LocalNetwork {
    fn connect(&self, addr: SocketAddr) -> Arc<dyn ReplicaRpc> {
        Arc::new(LocalLink {
            network: self.clone(),
            addr,
        })
    }
}

struct LocalLink {
    network: LocalNetwork,
    addr: SocketAddr,
}

#[async_trait::async_trait]
impl ReplicaRpc for LocalLink {
    async fn apply(&self, input: ApplyInput) -> Result<ApplyOutput, ReplicaError> {
        self.network.reach(self.addr)?.apply(input).await
    }

    async fn apply_as_backup(&self, input: ApplyAsBackupInput) -> Result<(), ReplicaError> {
        self.network.reach(self.addr)?.apply_as_backup(input).await
    }

    async fn become_primary(&self, input: BecomePrimaryInput) -> Result<(), ReplicaError> {
        self.network.reach(self.addr)?.become_primary(input).await
    }

    async fn get_state(&self, input: GetStateInput) -> Result<GetStateOutput, ReplicaError> {
        self.network.reach(self.addr)?.get_state(input).await
    }

    async fn set_state(&self, input: SetStateInput) -> Result<(), ReplicaError> {
        self.network.reach(self.addr)?.set_state(input).await
    }
}
