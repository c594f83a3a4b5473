use std::net::SocketAddr;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use crate::error::MeasurementError;
use crate::protocol::measurement_packet::MeasurementPacket;
use crate::server::send_socket::SendSocket;

#[derive(Debug, Clone)]
pub struct SentPacket {
    pub to: SocketAddr,
    pub packet: MeasurementPacket,
    pub at: Instant,
}

/// Records every packet that is sent (decoded, with its destination and the time of sending)
///  for later inspection
#[derive(Debug, Default)]
pub struct TrackingSendSocket {
    tracker: RwLock<Vec<SentPacket>>,
}

impl TrackingSendSocket {
    pub fn new() -> TrackingSendSocket {
        Default::default()
    }

    pub async fn sent_packets(&self) -> Vec<SentPacket> {
        self.tracker.read().await.clone()
    }

    pub async fn assert_packet_sent(&self, to: SocketAddr, packet: MeasurementPacket) {
        let mut lock = self.tracker.write().await;
        if lock.is_empty() {
            panic!("no packet was sent");
        }

        let sent = lock.remove(0);
        assert_eq!(sent.to, to);
        assert_eq!(sent.packet, packet);
    }

    pub async fn assert_no_remaining_packets(&self) {
        let lock = self.tracker.read().await;
        assert!(lock.is_empty(), "unexpected packets: {:?}", lock);
    }
}

#[async_trait]
impl SendSocket for TrackingSendSocket {
    async fn send_packet(&self, to: SocketAddr, packet_buf: &[u8]) -> Result<(), MeasurementError> {
        let packet = MeasurementPacket::deser(&mut &packet_buf[..])
            .expect("sent packet should be decodable");

        self.tracker.write().await.push(SentPacket {
            to,
            packet,
            at: Instant::now(),
        });
        Ok(())
    }
}
