use std::sync::Arc;
use clap::Parser;
use clap_derive::Parser;
use tracing::{error, info, Level};
use udp_burst_server::config::ServerConfig;
use udp_burst_server::server::udp_server::UdpServer;

/// UDP burst measurement server
#[derive(Parser)]
#[clap(version)]
struct Args {
    /// UDP port to listen on (1-65535), default 31341
    port: Option<String>,
}

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .try_init()
        .ok();

    let args = Args::parse();

    let port = match args.port {
        Some(s) => match ServerConfig::parse_port(&s) {
            Ok(port) => port,
            Err(e) => {
                error!("{}", e);
                return Err(e.into());
            }
        },
        None => ServerConfig::DEFAULT_PORT,
    };

    info!("UDP burst server (version {}) starting on port {}", env!("CARGO_PKG_VERSION"), port);

    let mut server = match UdpServer::bind(Arc::new(ServerConfig::for_port(port))).await {
        Ok(server) => server,
        Err(e) => {
            error!("error starting the server: {}", e);
            return Err(e);
        }
    };

    server.run().await;
    Ok(())
}
