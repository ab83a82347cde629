use std::convert::TryFrom;
use tokio::time::Duration;

#[derive(Clone, Default)]
pub struct ReplicaOptions {
    /// How long a call to a peer replica may take before it fails with `Timeout`. Defaults to 300ms.
    pub rpc_timeout: Option<Duration>,
    /// How many requests may queue up for the replica before callers wait. Defaults to 64.
    pub actor_queue_size: Option<usize>,
}

pub(super) struct ReplicaOptionsValidated {
    pub rpc_timeout: Duration,
    pub actor_queue_size: usize,
}

impl ReplicaOptionsValidated {
    fn validate(&self) -> Result<(), &'static str> {
        if self.rpc_timeout == Duration::from_millis(0) {
            return Err("RPC timeout must be non-zero");
        }
        if self.actor_queue_size == 0 {
            return Err("Actor queue size must be non-zero");
        }

        Ok(())
    }
}

impl TryFrom<ReplicaOptions> for ReplicaOptionsValidated {
    type Error = &'static str;

    fn try_from(options: ReplicaOptions) -> Result<Self, Self::Error> {
        let values = ReplicaOptionsValidated {
            rpc_timeout: options.rpc_timeout.unwrap_or(Duration::from_millis(300)),
            actor_queue_size: options.actor_queue_size.unwrap_or(64),
        };

        values.validate()?;
        Ok(values)
    }
}
