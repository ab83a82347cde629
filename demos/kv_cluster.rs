//! Runs a config authority and three KV replicas on localhost, then bootstraps, writes,
//! reconfigures, and reads back through the new primary.
use pbkv::{
    Coordinator, GrpcConfigClient, GrpcConnector, KvClerk, KvStateMachine, MemoryConfigAuthority, ReplicaOptions,
    ReplicaServerConfig,
};
use slog::Drain;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let logger = create_root_logger();
    let log_dir = std::env::temp_dir().join(format!("pbkv-demo-{}", std::process::id()));
    std::fs::create_dir_all(&log_dir)?;

    let config_addr = local_addr(7000);
    let _config_server = pbkv::spawn_config_server(
        logger.clone(),
        config_addr,
        Arc::new(MemoryConfigAuthority::new(logger.clone())),
    );

    let servers: Vec<SocketAddr> = (7001..=7003).map(local_addr).collect();
    let mut replicas = Vec::new();
    for addr in servers.iter() {
        let replica = pbkv::try_create_replica(ReplicaServerConfig {
            my_addr: *addr,
            log_file_path: log_dir.join(format!("{}.log", addr.port())),
            state_machine: KvStateMachine::new(),
            info_logger: logger.clone(),
            options: ReplicaOptions::default(),
        })
        .await?;
        replicas.push(replica);
    }
    tokio::time::sleep(Duration::from_millis(300)).await;

    let rpc_timeout = Duration::from_millis(300);
    let authority = Arc::new(GrpcConfigClient::new(logger.clone(), config_addr, rpc_timeout));
    let connector = Arc::new(GrpcConnector::new(logger.clone(), rpc_timeout));
    let coordinator = Coordinator::new(logger.clone(), authority.clone(), connector.clone());

    let epoch = coordinator.initialize_system(vec![servers[0], servers[1]]).await?;
    slog::info!(logger, "Initialized"; "epoch" => epoch.as_u64());

    let clerk = KvClerk::discover(authority.as_ref(), connector.as_ref()).await?;
    clerk.put(b"greeting", b"hello").await?;
    clerk.put(b"subject", b"world").await?;

    let epoch = coordinator.enter_new_config_retrying(vec![servers[2]], 5).await?;
    slog::info!(logger, "Reconfigured"; "epoch" => epoch.as_u64());

    let clerk = KvClerk::discover(authority.as_ref(), connector.as_ref()).await?;
    let greeting = clerk.get(b"greeting").await?;
    let subject = clerk.get(b"subject").await?;
    slog::info!(
        logger,
        "Read back from new primary: {} {}",
        String::from_utf8_lossy(&greeting),
        String::from_utf8_lossy(&subject)
    );

    for replica in replicas {
        let status = replica.status().await?;
        slog::info!(logger, "Final status"; "replica" => %replica.addr(), "status" => ?status);
    }

    std::fs::remove_dir_all(&log_dir)?;
    Ok(())
}

fn local_addr(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

fn create_root_logger() -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    slog::Logger::root(drain, slog::o!())
}
