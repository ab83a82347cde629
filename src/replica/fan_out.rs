use crate::replica::replica_api::ReplicaError;
use std::future::Future;

/// Run every call concurrently, one task each, and wait for all of them to finish.
///
/// Succeeds only if every call succeeded. Otherwise the first error, in input order, is returned.
/// A call whose task panicked counts as `Disconnected`.
pub(crate) async fn scatter_gather<F>(calls: Vec<F>) -> Result<(), ReplicaError>
where
    F: Future<Output = Result<(), ReplicaError>> + Send + 'static,
{
    let tasks: Vec<_> = calls.into_iter().map(tokio::spawn).collect();

    let mut outcome = Ok(());
    for task in tasks {
        let result = task.await.unwrap_or(Err(ReplicaError::Disconnected));
        if outcome.is_ok() {
            outcome = result;
        }
    }

    outcome
}
