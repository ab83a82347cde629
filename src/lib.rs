mod actor;
mod admin;
mod api;
mod commitlog;
mod config;
mod kv;
mod replica;
mod server;
mod grpc {
    include!("../generated/pb.rs");
}

pub use admin::Coordinator;
pub use admin::ReconfigError;
pub use api::try_create_replica;
pub use api::MalformedSnapshot;
pub use api::ReplicaCreationError;
pub use api::ReplicaHandle;
pub use api::ReplicaOptions;
pub use api::ReplicaServerConfig;
pub use api::StateMachine;
pub use commitlog::Index;
pub use commitlog::LogRecoveryError;
pub use config::ConfigAuthority;
pub use config::GrpcConfigClient;
pub use config::Lease;
pub use config::MemoryConfigAuthority;
pub use kv::encode_get;
pub use kv::encode_put;
pub use kv::DiscoverPrimaryError;
pub use kv::KvClerk;
pub use kv::KvStateMachine;
pub use replica::ApplyAsBackupInput;
pub use replica::ApplyInput;
pub use replica::ApplyOutput;
pub use replica::BecomePrimaryInput;
pub use replica::Epoch;
pub use replica::GetStateInput;
pub use replica::GetStateOutput;
pub use replica::GrpcConnector;
pub use replica::GrpcReplicaClient;
pub use replica::ReplicaConnector;
pub use replica::ReplicaError;
pub use replica::ReplicaRpc;
pub use replica::ReplicaStatus;
pub use replica::SetStateInput;
pub use server::spawn_config_server;
pub use server::ConfigServerHandle;

// `crate::{root_mod}` holds no code, only `mod` and `pub use` statements. Types leave the crate
// through individual `pub use` statements, never through a `pub mod`.
