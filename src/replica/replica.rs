use crate::api::StateMachine;
use crate::commitlog::{DurableFile, DurableStateMachine};
use crate::replica::replica_api::{
    ApplyAsBackupInput, ApplyInput, BecomePrimaryInput, GetStateInput, GetStateOutput, ReplicaError, ReplicaStatus,
    SetStateInput,
};
use crate::replica::rpc::{ReplicaConnector, ReplicaRpc};
use crate::replica::Epoch;
use bytes::Bytes;
use std::net::SocketAddr;
use std::{fmt, io};
use std::sync::Arc;

pub(crate) struct ReplicaConfig<F, M>
where
    F: DurableFile,
    M: StateMachine,
{
    pub logger: slog::Logger,
    pub my_addr: SocketAddr,
    pub log: DurableStateMachine<F, M>,
    pub connector: Arc<dyn ReplicaConnector>,
}

/// Replica is the epoch-fenced primary/backup role machine.
///
/// All methods are synchronous and take `&mut self`, so whoever owns the replica is its mutual
/// exclusion domain. Nothing here ever waits on the network: `handle_apply()` hands the
/// replication work back to the caller instead of performing it.
pub(crate) struct Replica<F, M>
where
    F: DurableFile,
    M: StateMachine,
{
    logger: slog::Logger,
    my_addr: SocketAddr,
    // Owns the durable epoch, next index and seal flag.
    log: DurableStateMachine<F, M>,
    is_primary: bool,
    backups: Vec<Backup>,
    connector: Arc<dyn ReplicaConnector>,
}

#[derive(Clone)]
pub(crate) struct Backup {
    pub addr: SocketAddr,
    pub clerk: Arc<dyn ReplicaRpc>,
}

impl fmt::Debug for Backup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Backup({})", self.addr)
    }
}

/// Why a replica operation didn't succeed.
#[derive(Debug)]
pub(crate) enum ReplicaFailure {
    // The caller gets this back. Replica state is intact.
    Rejected(ReplicaError),
    // The durable log couldn't be written. The replica must stop serving.
    Fatal(io::Error),
}

impl From<ReplicaError> for ReplicaFailure {
    fn from(e: ReplicaError) -> Self {
        ReplicaFailure::Rejected(e)
    }
}

impl From<io::Error> for ReplicaFailure {
    fn from(e: io::Error) -> Self {
        ReplicaFailure::Fatal(e)
    }
}

/// An op that's been durably applied on the primary and now has to reach every backup before the
/// client can be told it succeeded.
#[derive(Debug)]
pub(crate) struct PendingReplication {
    pub result: Bytes,
    pub request: ApplyAsBackupInput,
    pub backups: Vec<Backup>,
}

impl<F, M> Replica<F, M>
where
    F: DurableFile,
    M: StateMachine,
{
    pub fn new(config: ReplicaConfig<F, M>) -> Self {
        Replica {
            logger: config.logger,
            my_addr: config.my_addr,
            log: config.log,
            is_primary: false,
            backups: Vec::new(),
            connector: config.connector,
        }
    }

    /// Must run before any request-specific logic of an operation that carries an epoch.
    ///
    /// A newer epoch is adopted durably and demotes this replica; an older one is `Stale`.
    fn epoch_fence(&mut self, epoch: Epoch) -> Result<(), ReplicaFailure> {
        let current_epoch = self.log.epoch();
        if epoch > current_epoch {
            self.log.enter_epoch(epoch)?;
            if self.is_primary {
                slog::info!(
                    self.logger,
                    "Demoted by newer epoch";
                    "old_epoch" => current_epoch.as_u64(),
                    "epoch" => epoch.as_u64()
                );
            }
            self.is_primary = false;
            self.backups.clear();
            return Ok(());
        }

        if epoch < current_epoch {
            return Err(ReplicaError::Stale.into());
        }

        Ok(())
    }

    pub fn handle_apply(&mut self, input: ApplyInput) -> Result<PendingReplication, ReplicaFailure> {
        // A primary's log is only sealed if someone already started handing its state off.
        if !self.is_primary || self.log.is_sealed() {
            return Err(ReplicaError::Stale.into());
        }

        let index = self.log.next_index();
        let result = self.log.apply(&input.op)?;

        Ok(PendingReplication {
            result,
            request: ApplyAsBackupInput {
                epoch: self.log.epoch(),
                index,
                op: input.op,
            },
            backups: self.backups.clone(),
        })
    }

    pub fn handle_apply_as_backup(&mut self, input: ApplyAsBackupInput) -> Result<(), ReplicaFailure> {
        self.epoch_fence(input.epoch)?;

        let next_index = self.log.next_index();
        if input.index != next_index {
            slog::debug!(
                self.logger,
                "Rejecting out of order op";
                "index" => input.index.as_u64(),
                "next_index" => next_index.as_u64()
            );
            return Err(ReplicaError::OutOfOrder.into());
        }
        if self.log.is_sealed() {
            return Err(ReplicaError::Stale.into());
        }

        self.log.apply(&input.op)?;
        Ok(())
    }

    pub fn handle_become_primary(&mut self, input: BecomePrimaryInput) -> Result<(), ReplicaFailure> {
        self.epoch_fence(input.epoch)?;

        let my_addr = self.my_addr;
        let connector = &self.connector;
        self.backups = input
            .replicas
            .into_iter()
            .filter(|addr| *addr != my_addr)
            .map(|addr| Backup {
                addr,
                clerk: connector.connect(addr),
            })
            .collect();
        self.is_primary = true;

        slog::info!(
            self.logger,
            "Became primary";
            "epoch" => self.log.epoch().as_u64(),
            "backups" => ?self.backups.iter().map(|b| b.addr).collect::<Vec<_>>()
        );
        Ok(())
    }

    pub fn handle_get_state(&mut self, input: GetStateInput) -> Result<GetStateOutput, ReplicaFailure> {
        self.epoch_fence(input.epoch)?;

        let state = self.log.seal_and_snapshot()?;
        Ok(GetStateOutput {
            state,
            next_index: self.log.next_index(),
        })
    }

    /// Install state handed off from a member of the previous configuration.
    ///
    /// Unlike the fence, this refuses an equal epoch, unless this replica is the one the state was
    /// just taken from: sealed at that epoch and not primary. On success the epoch and next index
    /// are adopted from the input and the log is unsealed, so the replica is ready to serve as a
    /// backup (or be promoted) in the new epoch.
    pub fn handle_set_state(&mut self, input: SetStateInput) -> Result<(), ReplicaFailure> {
        let current_epoch = self.log.epoch();
        let donated_at_epoch = current_epoch == input.epoch && self.log.is_sealed() && !self.is_primary;
        if current_epoch > input.epoch || (current_epoch == input.epoch && !donated_at_epoch) {
            return Err(ReplicaError::Stale.into());
        }

        self.log
            .set_state_and_unseal(&input.state, input.epoch, input.next_index)?
            .map_err(|e| {
                slog::warn!(self.logger, "Refusing to install state: {}", e);
                ReplicaError::MalformedSnapshot
            })?;
        self.is_primary = false;
        self.backups.clear();

        slog::info!(
            self.logger,
            "Installed state";
            "epoch" => input.epoch.as_u64(),
            "next_index" => input.next_index.as_u64()
        );
        Ok(())
    }

    pub fn status(&self) -> ReplicaStatus {
        ReplicaStatus {
            epoch: self.log.epoch(),
            next_index: self.log.next_index(),
            is_primary: self.is_primary,
            sealed: self.log.is_sealed(),
        }
    }

    pub fn compact_log(&mut self) -> Result<(), ReplicaFailure> {
        self.log.compact()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitlog::{InMemoryFile, Index};
    use crate::kv::{encode_get, encode_put, KvStateMachine};
    use crate::replica::{addr, test_logger, LocalNetwork};

    fn new_replica(file: InMemoryFile) -> Replica<InMemoryFile, KvStateMachine> {
        let logger = test_logger();
        let log = DurableStateMachine::recover(logger.clone(), file, KvStateMachine::new()).unwrap();
        Replica::new(ReplicaConfig {
            logger,
            my_addr: addr(1),
            log,
            connector: Arc::new(LocalNetwork::new()),
        })
    }

    fn rejected(result: Result<impl std::fmt::Debug, ReplicaFailure>) -> ReplicaError {
        match result {
            Err(ReplicaFailure::Rejected(e)) => e,
            other => panic!("Expected a rejection, got {:?}", other),
        }
    }

    fn become_primary(replica: &mut Replica<InMemoryFile, KvStateMachine>, epoch: u64, replicas: Vec<SocketAddr>) {
        replica
            .handle_become_primary(BecomePrimaryInput {
                epoch: Epoch::new(epoch),
                replicas,
            })
            .unwrap();
    }

    fn backup_op(epoch: u64, index: u64, key: &str, value: &str) -> ApplyAsBackupInput {
        ApplyAsBackupInput {
            epoch: Epoch::new(epoch),
            index: Index::new(index),
            op: encode_put(key.as_bytes(), value.as_bytes()),
        }
    }

    fn get(replica: &mut Replica<InMemoryFile, KvStateMachine>, key: &str) -> Bytes {
        replica
            .handle_apply(ApplyInput {
                op: encode_get(key.as_bytes()),
            })
            .unwrap()
            .result
    }

    #[test]
    fn apply_requires_primary() {
        let mut replica = new_replica(InMemoryFile::new());

        let e = rejected(replica.handle_apply(ApplyInput {
            op: encode_put(b"k", b"v"),
        }));

        assert_eq!(e, ReplicaError::Stale);
        assert_eq!(replica.status().next_index, Index::new(0));
    }

    #[test]
    fn apply_hands_back_replication_at_pre_apply_index() {
        let mut replica = new_replica(InMemoryFile::new());
        become_primary(&mut replica, 1, vec![addr(1), addr(2), addr(3)]);

        let first = replica
            .handle_apply(ApplyInput {
                op: encode_put(b"k", b"v"),
            })
            .unwrap();
        let second = replica
            .handle_apply(ApplyInput { op: encode_get(b"k") })
            .unwrap();

        assert_eq!(first.request.index, Index::new(0));
        assert_eq!(second.request.index, Index::new(1));
        assert_eq!(second.request.epoch, Epoch::new(1));
        assert_eq!(second.result, Bytes::from("v"));
        // Never replicates to itself.
        let backups: Vec<SocketAddr> = second.backups.iter().map(|b| b.addr).collect();
        assert_eq!(backups, vec![addr(2), addr(3)]);
    }

    #[test]
    fn newer_epoch_demotes_and_resets_index() {
        let mut replica = new_replica(InMemoryFile::new());
        become_primary(&mut replica, 1, vec![addr(1)]);
        replica
            .handle_apply(ApplyInput {
                op: encode_put(b"k", b"v"),
            })
            .unwrap();

        replica.handle_apply_as_backup(backup_op(2, 0, "k", "v2")).unwrap();

        let status = replica.status();
        assert_eq!(status.epoch, Epoch::new(2));
        assert!(!status.is_primary);
        assert_eq!(status.next_index, Index::new(1));
    }

    #[test]
    fn stale_epoch_is_rejected_everywhere() {
        let mut replica = new_replica(InMemoryFile::new());
        become_primary(&mut replica, 5, vec![addr(1)]);

        let e = rejected(replica.handle_apply_as_backup(backup_op(4, 0, "k", "v")));
        assert_eq!(e, ReplicaError::Stale);
        let e = rejected(replica.handle_become_primary(BecomePrimaryInput {
            epoch: Epoch::new(4),
            replicas: vec![addr(1)],
        }));
        assert_eq!(e, ReplicaError::Stale);
        let e = rejected(replica.handle_get_state(GetStateInput { epoch: Epoch::new(3) }));
        assert_eq!(e, ReplicaError::Stale);

        let status = replica.status();
        assert_eq!(status.epoch, Epoch::new(5));
        assert!(status.is_primary);
        assert!(!status.sealed);
    }

    #[test]
    fn become_primary_is_idempotent() {
        let mut replica = new_replica(InMemoryFile::new());
        become_primary(&mut replica, 3, vec![addr(1), addr(2)]);
        become_primary(&mut replica, 3, vec![addr(1), addr(2)]);

        let pending = replica
            .handle_apply(ApplyInput {
                op: encode_put(b"k", b"v"),
            })
            .unwrap();
        assert_eq!(pending.backups.len(), 1);
        assert_eq!(replica.status().epoch, Epoch::new(3));
    }

    #[test]
    fn out_of_order_op_has_no_side_effect() {
        let mut replica = new_replica(InMemoryFile::new());
        replica.handle_apply_as_backup(backup_op(1, 0, "a", "1")).unwrap();

        let before = replica.status();
        for index in [0, 2, 7] {
            let e = rejected(replica.handle_apply_as_backup(backup_op(1, index, "a", "clobbered")));
            assert_eq!(e, ReplicaError::OutOfOrder);
        }

        assert_eq!(replica.status(), before);
        become_primary(&mut replica, 1, vec![addr(1)]);
        assert_eq!(get(&mut replica, "a"), Bytes::from("1"));
    }

    #[test]
    fn get_state_with_newer_epoch_demotes_and_seals() {
        let mut replica = new_replica(InMemoryFile::new());
        become_primary(&mut replica, 1, vec![addr(1)]);
        replica
            .handle_apply(ApplyInput {
                op: encode_put(b"k", b"v"),
            })
            .unwrap();

        let output = replica.handle_get_state(GetStateInput { epoch: Epoch::new(2) }).unwrap();

        // The fence reset the index before the state was read.
        assert_eq!(output.next_index, Index::new(0));
        let status = replica.status();
        assert!(!status.is_primary);
        assert!(status.sealed);
        assert_eq!(status.epoch, Epoch::new(2));

        let mut restored = KvStateMachine::new();
        restored.restore(&output.state).unwrap();
        assert_eq!(restored.apply(&encode_get(b"k")), Bytes::from("v"));
    }

    #[test]
    fn sealed_replica_refuses_new_ops() {
        let mut replica = new_replica(InMemoryFile::new());
        become_primary(&mut replica, 1, vec![addr(1)]);
        replica.handle_get_state(GetStateInput { epoch: Epoch::new(1) }).unwrap();

        let e = rejected(replica.handle_apply(ApplyInput {
            op: encode_put(b"k", b"v"),
        }));
        assert_eq!(e, ReplicaError::Stale);
        let e = rejected(replica.handle_apply_as_backup(backup_op(1, 0, "k", "v")));
        assert_eq!(e, ReplicaError::Stale);
    }

    #[test]
    fn set_state_adopts_epoch_and_next_index() {
        let mut donor = new_replica(InMemoryFile::new());
        become_primary(&mut donor, 1, vec![addr(1)]);
        donor
            .handle_apply(ApplyInput {
                op: encode_put(b"k", b"v"),
            })
            .unwrap();
        let handoff = donor.handle_get_state(GetStateInput { epoch: Epoch::new(1) }).unwrap();

        let file = InMemoryFile::new();
        let mut replica = new_replica(file.clone());
        replica
            .handle_set_state(SetStateInput {
                epoch: Epoch::new(2),
                state: handoff.state.clone(),
                next_index: handoff.next_index,
            })
            .unwrap();

        let status = replica.status();
        assert_eq!(status.epoch, Epoch::new(2));
        assert_eq!(status.next_index, Index::new(1));
        assert!(!status.sealed);
        assert!(!status.is_primary);

        // The adopted position is durable.
        let recovered = new_replica(file);
        assert_eq!(recovered.status().epoch, Epoch::new(2));
        assert_eq!(recovered.status().next_index, Index::new(1));
    }

    #[test]
    fn set_state_rejects_equal_or_older_epoch() {
        let mut replica = new_replica(InMemoryFile::new());
        replica.handle_apply_as_backup(backup_op(3, 0, "k", "v")).unwrap();

        for epoch in [2, 3] {
            let e = rejected(replica.handle_set_state(SetStateInput {
                epoch: Epoch::new(epoch),
                state: KvStateMachine::new().snapshot(),
                next_index: Index::new(0),
            }));
            assert_eq!(e, ReplicaError::Stale);
        }
        assert_eq!(replica.status().next_index, Index::new(1));
    }

    #[test]
    fn donor_accepts_state_at_the_epoch_it_was_sealed_in() {
        let file = InMemoryFile::new();
        let mut replica = new_replica(file.clone());
        become_primary(&mut replica, 1, vec![addr(1)]);
        replica
            .handle_apply(ApplyInput {
                op: encode_put(b"k", b"v"),
            })
            .unwrap();
        let handoff = replica.handle_get_state(GetStateInput { epoch: Epoch::new(2) }).unwrap();

        replica
            .handle_set_state(SetStateInput {
                epoch: Epoch::new(2),
                state: handoff.state,
                next_index: handoff.next_index,
            })
            .unwrap();

        let status = replica.status();
        assert_eq!(status.epoch, Epoch::new(2));
        assert!(!status.sealed);
        assert!(!new_replica(file).status().sealed);

        // Once unsealed, the same epoch is refused again.
        let e = rejected(replica.handle_set_state(SetStateInput {
            epoch: Epoch::new(2),
            state: KvStateMachine::new().snapshot(),
            next_index: Index::new(0),
        }));
        assert_eq!(e, ReplicaError::Stale);
        become_primary(&mut replica, 2, vec![addr(1)]);
        assert_eq!(get(&mut replica, "k"), Bytes::from("v"));
    }

    #[test]
    fn sealed_primary_refuses_state_at_its_own_epoch() {
        let mut replica = new_replica(InMemoryFile::new());
        become_primary(&mut replica, 1, vec![addr(1)]);
        replica.handle_get_state(GetStateInput { epoch: Epoch::new(1) }).unwrap();

        let e = rejected(replica.handle_set_state(SetStateInput {
            epoch: Epoch::new(1),
            state: KvStateMachine::new().snapshot(),
            next_index: Index::new(0),
        }));

        assert_eq!(e, ReplicaError::Stale);
        assert!(replica.status().sealed);
    }

    #[test]
    fn same_epoch_become_primary_is_accepted_by_every_replica() {
        // Nothing at the replica level enforces a single primary per epoch. The authority hands
        // each epoch to one coordinator, and only that coordinator promotes a replica at it.
        let mut first = new_replica(InMemoryFile::new());
        let mut second = new_replica(InMemoryFile::new());

        become_primary(&mut first, 4, vec![addr(1), addr(2)]);
        become_primary(&mut second, 4, vec![addr(2), addr(1)]);

        assert!(first.status().is_primary);
        assert!(second.status().is_primary);
        assert_eq!(first.status().epoch, second.status().epoch);
    }

    #[test]
    fn set_state_rejects_malformed_snapshot() {
        let mut replica = new_replica(InMemoryFile::new());

        let e = rejected(replica.handle_set_state(SetStateInput {
            epoch: Epoch::new(1),
            state: Bytes::from_static(b"\x01"),
            next_index: Index::new(4),
        }));

        assert_eq!(e, ReplicaError::MalformedSnapshot);
        assert_eq!(replica.status().epoch, Epoch::new(0));
    }

    #[test]
    fn fencing_survives_a_crash() {
        let file = InMemoryFile::new();
        let mut replica = new_replica(file.clone());
        replica.handle_get_state(GetStateInput { epoch: Epoch::new(7) }).unwrap();
        drop(replica);

        let mut recovered = new_replica(file);
        let e = rejected(recovered.handle_become_primary(BecomePrimaryInput {
            epoch: Epoch::new(6),
            replicas: vec![addr(1)],
        }));
        assert_eq!(e, ReplicaError::Stale);
    }
}
