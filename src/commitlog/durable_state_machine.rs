use crate::api::StateMachine;
use crate::commitlog::format::{self, LogRecoveryError, SEAL_MARKER};
use crate::commitlog::{DurableFile, Index};
use crate::replica::Epoch;
use crate::MalformedSnapshot;
use bytes::Bytes;
use std::io;

/// DurableStateMachine wraps the application's state machine with a durable, recoverable log.
///
/// Every op is appended to the log before it is applied in memory, so any effect an external
/// caller has observed can be reconstructed by `recover()` after a crash. The log is also where the
/// replica's epoch and next index live; the replica never keeps a second copy of them.
///
/// This type has no concurrency of its own. The owning replica serializes all access.
pub(crate) struct DurableStateMachine<F, M>
where
    F: DurableFile,
    M: StateMachine,
{
    logger: slog::Logger,
    file: F,
    app: M,

    epoch: Epoch,
    next_index: Index,
    // No further op records may be appended until the next full rewrite.
    sealed: bool,
}

impl<F, M> DurableStateMachine<F, M>
where
    F: DurableFile,
    M: StateMachine,
{
    /// Rebuild in-memory state from `file`. An empty file is initialized with `app`'s current
    /// state at epoch 0.
    pub(crate) fn recover(logger: slog::Logger, mut file: F, mut app: M) -> Result<Self, LogRecoveryError> {
        let contents = file.read_all()?;
        if contents.is_empty() {
            let epoch = Epoch::new(0);
            let next_index = Index::start_index();
            file.write_all(&format::encode_header(&app.snapshot(), epoch, next_index, false))?;
            slog::info!(logger, "Initialized empty log");

            return Ok(DurableStateMachine {
                logger,
                file,
                app,
                epoch,
                next_index,
                sealed: false,
            });
        }

        let decoded = format::decode(Bytes::from(contents))?;
        app.restore(&decoded.snapshot)?;

        let mut next_index = decoded.next_index;
        for op in decoded.ops.iter() {
            app.apply(op);
            next_index.incr();
        }

        slog::info!(
            logger,
            "Recovered log";
            "epoch" => decoded.epoch.as_u64(),
            "replayed_ops" => decoded.ops.len(),
            "next_index" => next_index.as_u64(),
            "sealed" => decoded.sealed
        );

        Ok(DurableStateMachine {
            logger,
            file,
            app,
            epoch: decoded.epoch,
            next_index,
            sealed: decoded.sealed,
        })
    }

    pub(crate) fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub(crate) fn next_index(&self) -> Index {
        self.next_index
    }

    pub(crate) fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Durably log `op`, then apply it. Callers must check `is_sealed()` first.
    pub(crate) fn apply(&mut self, op: &[u8]) -> Result<Bytes, io::Error> {
        assert!(!self.sealed, "Attempted to append an op to a sealed log. This is a bug.");

        self.file.atomic_append(&format::encode_op(op))?;
        // Only touch memory once the op is durable.
        self.next_index.incr();
        Ok(self.app.apply(op))
    }

    /// Seal the log (at most once per generation) and return the application's snapshot.
    pub(crate) fn seal_and_snapshot(&mut self) -> Result<Bytes, io::Error> {
        if !self.sealed {
            self.file.atomic_append(&[SEAL_MARKER])?;
            self.sealed = true;
            slog::info!(self.logger, "Sealed log"; "epoch" => self.epoch.as_u64());
        }

        Ok(self.app.snapshot())
    }

    /// Replace all state with a snapshot received from another replica.
    ///
    /// Returns `Ok(Err(_))` without changing anything if the snapshot can't be restored.
    pub(crate) fn set_state_and_unseal(
        &mut self,
        snapshot: &[u8],
        epoch: Epoch,
        next_index: Index,
    ) -> Result<Result<(), MalformedSnapshot>, io::Error> {
        if let Err(e) = self.app.restore(snapshot) {
            return Ok(Err(e));
        }

        self.file
            .write_all(&format::encode_header(snapshot, epoch, next_index, false))?;
        self.epoch = epoch;
        self.next_index = next_index;
        self.sealed = false;

        Ok(Ok(()))
    }

    /// Start a new, unsealed generation of the log at `epoch`, with the index reset to the start.
    pub(crate) fn enter_epoch(&mut self, epoch: Epoch) -> Result<(), io::Error> {
        assert!(
            epoch > self.epoch,
            "Can't move epoch backwards or sideways. Expected [input] {:?} > {:?} [current]",
            epoch,
            self.epoch,
        );

        let snapshot = self.app.snapshot();
        self.file
            .write_all(&format::encode_header(&snapshot, epoch, Index::start_index(), false))?;
        self.epoch = epoch;
        self.next_index = Index::start_index();
        self.sealed = false;

        Ok(())
    }

    /// Rewrite the log as a single snapshot of current state, discarding the op records.
    pub(crate) fn compact(&mut self) -> Result<(), io::Error> {
        let snapshot = self.app.snapshot();
        self.file
            .write_all(&format::encode_header(&snapshot, self.epoch, self.next_index, self.sealed))
    }
}
