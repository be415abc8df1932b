use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use plaza::server::{DEFAULT_PORT, Server, ServerConfig};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "plaza=info,plaza_server=info,tower_http=info";

#[derive(Parser, Debug)]
#[command(name = "plaza")]
#[command(about = "Presence and WebRTC signaling server for a shared virtual room")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(short, long, env = "PLAZA_BIND", default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Directory with the browser client, served at `/`
    #[arg(long, env = "PLAZA_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Events queued per connection before new ones are dropped for it
    #[arg(long, default_value_t = 256)]
    outbox_capacity: usize,

    /// Log filter, overrides RUST_LOG (e.g. `plaza_server=debug`)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind: SocketAddr::new(self.bind, self.port),
            static_dir: self.static_dir.clone(),
            outbox_capacity: self.outbox_capacity,
            ..ServerConfig::default()
        }
    }
}

fn init_tracing(log_level: Option<&str>) -> Result<()> {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).context("Invalid --log-level filter")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref())?;

    let config = args.server_config();
    if let Some(dir) = &config.static_dir
        && !dir.is_dir()
    {
        anyhow::bail!("Static directory {} does not exist", dir.display());
    }

    let server = Server::bind(config)
        .await
        .context("Failed to start plaza")?;

    println!("{}", "🚀 Plaza is up".green().bold());
    println!("   🔌 WebSocket: ws://{}/ws?name=<you>", server.local_addr());
    println!("   ❤️  Health:    http://{}/health", server.local_addr());
    if let Some(dir) = &args.static_dir {
        println!("   📂 Static:    {}", dir.display());
    }

    server
        .run(shutdown_signal())
        .await
        .context("Server stopped unexpectedly")?;

    println!("{}", "👋 Plaza stopped".cyan());
    Ok(())
}
