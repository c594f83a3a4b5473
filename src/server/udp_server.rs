use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::anyhow;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{error, info};
use crate::config::ServerConfig;
use crate::server::packet_processor::PacketProcessor;

/// The UDP burst server: owns the socket and runs the receive loop.
///
/// The receive loop is the single place where incoming packets are processed and uplink
///  sessions are kept. Downlink bursts run as separate tasks sharing the socket for sending.
pub struct UdpServer {
    config: Arc<ServerConfig>,
    socket: Arc<UdpSocket>,
    processor: PacketProcessor,
}

impl UdpServer {
    /// Binds the server's socket. Failure to bind is fatal for the server.
    pub async fn bind(config: Arc<ServerConfig>) -> anyhow::Result<UdpServer> {
        config.validate()?;

        let socket = UdpSocket::bind(config.self_addr).await
            .map_err(|e| anyhow!("failed to bind UDP socket to {}: {}", config.self_addr, e))?;
        let socket = Arc::new(socket);
        info!("bound UDP socket to {:?}", socket.local_addr()?);

        let processor = PacketProcessor::new(config.clone(), socket.clone());
        Ok(UdpServer {
            config,
            socket,
            processor,
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Receives and processes datagrams forever.
    ///
    /// Every time no datagram arrives for the configured receive timeout, all open uplink sessions
    ///  are flushed. Receive errors are logged and do not terminate the loop.
    pub async fn run(&mut self) {
        info!("starting receive loop");

        let mut buf = vec![0u8; self.config.receive_buffer_size];
        loop {
            match timeout(self.config.receive_timeout, self.socket.recv_from(&mut buf)).await {
                Ok(Ok((num_read, from))) => {
                    self.processor.on_datagram(from, &buf[..num_read]).await;
                }
                Ok(Err(e)) => {
                    error!("socket error: {}", e);
                }
                Err(_) => {
                    self.processor.on_receive_timeout().await;
                }
            }
        }
    }
}
