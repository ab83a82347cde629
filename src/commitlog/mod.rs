//! This module is the replica's durable log: the single file that makes a replica's state survive
//! a crash, and the application state machine it protects.

mod durable_state_machine;
mod format;
#[cfg(test)]
mod in_memory;
mod log;
mod storage;

pub(crate) use durable_state_machine::DurableStateMachine;
pub use format::LogRecoveryError;
pub use log::Index;
pub(crate) use storage::DiskFile;
pub(crate) use storage::DurableFile;

#[cfg(test)]
pub(crate) use in_memory::InMemoryFile;
