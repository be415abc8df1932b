
use anyhow::Result;
use std::net::SocketAddr;
use tracing::Level;

use plaza_server::{AppState, Registry, RegistryHandle, Server, ServerConfig};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_test_registry() -> RegistryHandle {
    Registry::spawn(100)
}

/// Starts a full server on an ephemeral localhost port. It runs until the
/// test's runtime shuts down.
pub async fn spawn_test_server() -> Result<(SocketAddr, AppState)> {
    let config = ServerConfig {
        bind: SocketAddr::from(([127, 0, 0, 1], 0)),
        ..ServerConfig::default()
    };

    let server = Server::bind(config).await?;
    let addr = server.local_addr();
    let state = server.state().clone();

    tokio::spawn(server.run(std::future::pending()));

    Ok((addr, state))
}
