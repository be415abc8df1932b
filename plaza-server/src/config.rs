use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;

/// Runtime settings for [`crate::Server`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Directory served at `/` for the browser client, if any.
    pub static_dir: Option<PathBuf>,
    /// Events buffered per connection before new ones are dropped for it.
    pub outbox_capacity: usize,
    /// Pending commands the registry accepts before callers wait.
    pub registry_queue: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            static_dir: None,
            outbox_capacity: 256,
            registry_queue: 1024,
        }
    }
}
