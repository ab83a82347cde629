//! This module is the contract with the configuration authority, plus two implementations of it.
mod authority;
mod grpc_client;
mod memory;

pub use authority::ConfigAuthority;
pub use authority::Lease;
pub use grpc_client::GrpcConfigClient;
pub use memory::MemoryConfigAuthority;
