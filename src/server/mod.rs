mod channel;
mod config_server;
mod server;
mod shutdown;
mod wire;

pub use config_server::spawn_config_server;
pub use config_server::ConfigServerHandle;
pub use server::ReplicaRpcServer;
pub(crate) use channel::PeerChannel;
pub(crate) use shutdown::shutdown_signal;
pub(crate) use shutdown::RpcServerShutdownHandle;
pub(crate) use shutdown::RpcServerShutdownSignal;
pub(crate) use wire::{addrs_from_proto, addrs_to_proto, empty_result_from_proto, error_from_proto};
