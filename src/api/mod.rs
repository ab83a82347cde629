//! This mod is meant to hold most of the code for the library's client-facing API.
mod options;
mod state_machine;
mod wiring;

pub use options::ReplicaOptions;
pub use state_machine::MalformedSnapshot;
pub use state_machine::StateMachine;
pub use wiring::try_create_replica;
pub use wiring::ReplicaCreationError;
pub use wiring::ReplicaHandle;
pub use wiring::ReplicaServerConfig;
