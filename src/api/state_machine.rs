use bytes::Bytes;

/// StateMachine is the application specific view of applying operations in the order the primary
/// chose for them.
///
/// `apply()` must be deterministic given current state and the op: backups and crash recovery
/// re-run the same ops and must land on the same state the primary did. Ops are applied exactly
/// once per replica, after they have been durably logged, so the impl need not be reversible.
pub trait StateMachine: Send + 'static {
    /// Apply `op` and return an opaque result to hand back to the client who submitted it.
    fn apply(&mut self, op: &[u8]) -> Bytes;

    /// Serialize all application state.
    fn snapshot(&self) -> Bytes;

    /// Replace all application state with a `snapshot()` taken on this or another replica. On error,
    /// state must be left exactly as it was.
    fn restore(&mut self, snapshot: &[u8]) -> Result<(), MalformedSnapshot>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed snapshot: {0}")]
pub struct MalformedSnapshot(pub String);
