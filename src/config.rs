use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;
use anyhow::bail;
use crate::error::MeasurementError;
use crate::protocol::measurement_packet::MeasurementPacket;

#[derive(Debug)]
pub struct ServerConfig {
    /// The address that the server's UDP socket is bound to
    pub self_addr: SocketAddr,

    /// If no datagram arrives for this long, *all* open uplink sessions are flushed, i.e. their
    ///  RESPONSE is sent with whatever was received so far.
    ///
    /// NB: This is a global timeout for the receive loop, not an idle timeout per session. A
    ///      session that was updated a millisecond before the timeout fires is flushed as well.
    pub receive_timeout: Duration,

    /// Size of the buffer incoming datagrams are received into. Bytes beyond this size are
    ///  truncated by the OS, which is harmless since only the packet header is evaluated.
    ///  Larger than a regular Ethernet MTU to leave some margin.
    pub receive_buffer_size: usize,

    /// Minimum `packet size` for a downlink REQUEST - this is the length of the packet header
    pub min_packet_size: i32,
    /// Maximum `packet size` for a downlink REQUEST, leaving margin below the minimum MTU on
    ///  the route plus IP options
    pub max_packet_size: i32,
    /// Maximum `burst count` for a downlink REQUEST
    pub max_burst_count: i32,
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 31341;

    pub fn new(self_addr: SocketAddr) -> ServerConfig {
        ServerConfig {
            self_addr,
            receive_timeout: Duration::from_millis(3000),
            receive_buffer_size: 1500,
            min_packet_size: MeasurementPacket::SERIALIZED_LEN_I32,
            max_packet_size: 512,
            max_burst_count: 100,
        }
    }

    /// config for listening on all IPV4 interfaces on the given port
    pub fn for_port(port: u16) -> ServerConfig {
        Self::new(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port).into())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.receive_timeout.is_zero() {
            bail!("receive timeout must be positive");
        }
        if self.min_packet_size < MeasurementPacket::SERIALIZED_LEN_I32 {
            bail!("minimum packet size {} is shorter than the packet header ({} bytes)", self.min_packet_size, MeasurementPacket::SERIALIZED_LEN);
        }
        if self.max_packet_size < self.min_packet_size {
            bail!("maximum packet size {} is less than minimum packet size {}", self.max_packet_size, self.min_packet_size);
        }
        if usize::try_from(self.max_packet_size).map_or(true, |max| max > self.receive_buffer_size) {
            bail!("maximum packet size {} exceeds the receive buffer size {}", self.max_packet_size, self.receive_buffer_size);
        }
        if self.max_burst_count < 1 {
            bail!("maximum burst count must be positive, was {}", self.max_burst_count);
        }
        Ok(())
    }

    /// Parses a UDP port from its command line representation. Port 0 ('pick any free port')
    ///  is rejected since clients need to know the port in advance.
    pub fn parse_port(s: &str) -> Result<u16, MeasurementError> {
        match s.trim().parse::<u16>() {
            Ok(0) | Err(_) => Err(MeasurementError::Validation {
                reason: format!("invalid port {:?}, must be between 1 and 65535", s),
            }),
            Ok(port) => Ok(port),
        }
    }
}
