//! A replicated key-value store: the application state machine plus a client clerk.
mod clerk;
mod state_machine;

pub use clerk::DiscoverPrimaryError;
pub use clerk::KvClerk;
pub use state_machine::encode_get;
pub use state_machine::encode_put;
pub use state_machine::KvStateMachine;
