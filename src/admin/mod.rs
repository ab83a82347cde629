//! This module holds the administrative side: bootstrapping and reconfiguring the replica set.
mod coordinator;

pub use coordinator::Coordinator;
pub use coordinator::ReconfigError;
