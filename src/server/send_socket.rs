use async_trait::async_trait;
#[cfg(test)] use mockall::automock;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{info, trace};
use crate::error::MeasurementError;
use crate::protocol::client_id::ClientIdentifier;
use crate::protocol::measurement_packet::MeasurementPacket;

/// This is an abstraction for sending a buffer on a UDP socket, introduced to facilitate mocking
///  the I/O part away for testing.
///
/// The socket is shared between the receive loop and all running downlink senders. Each call
///  sends one complete datagram, so concurrent calls do not interfere with each other.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SendSocket: Send + Sync + 'static {
    async fn send_packet(&self, to: SocketAddr, packet_buf: &[u8]) -> Result<(), MeasurementError>;
}

#[async_trait]
impl SendSocket for UdpSocket {
    async fn send_packet(&self, to: SocketAddr, packet_buf: &[u8]) -> Result<(), MeasurementError> {
        trace!("UDP socket: sending packet to {:?}", to);
        self.send_to(packet_buf, to).await?;
        Ok(())
    }
}

/// Serializes a packet's header and sends it to a client, logging what was sent.
pub async fn send_measurement_packet(socket: &dyn SendSocket, to: ClientIdentifier, packet: &MeasurementPacket) -> Result<(), MeasurementError> {
    let buf = packet.to_buf();
    socket.send_packet(to.socket_addr(), buf.as_ref()).await?;
    info!("sent packet to {}: {}", to, packet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;
    use std::sync::Arc;
    use crate::test_util::packet::client_id;

    #[tokio::test]
    async fn test_send_measurement_packet() {
        let packet = MeasurementPacket::response(5, 4, 1, 3, 100);
        let expected_addr = client_id(1).socket_addr();
        let expected_buf = packet.to_buf().to_vec();

        let mut send_socket = MockSendSocket::new();
        send_socket.expect_send_packet()
            .withf(move |to, packet_buf| *to == expected_addr && packet_buf == expected_buf.as_slice())
            .times(1)
            .returning(|_, _| Ok(()));

        send_measurement_packet(&send_socket, client_id(1), &packet).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_measurement_packet_error() {
        let mut send_socket = MockSendSocket::new();
        send_socket.expect_send_packet()
            .times(1)
            .returning(|_, _| Err(std::io::Error::new(ErrorKind::Other, "network unreachable").into()));

        let result = send_measurement_packet(&send_socket, client_id(1), &MeasurementPacket::error(36)).await;
        assert!(matches!(result, Err(MeasurementError::Transport(_))));
    }

    #[tokio::test]
    async fn test_udp_socket_sends_datagram() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let sender: Arc<dyn SendSocket> = Arc::new(UdpSocket::bind("127.0.0.1:0").await.unwrap());

        let packet = MeasurementPacket::data(3, 1, 12345, 36);
        send_measurement_packet(sender.as_ref(), receiver.local_addr().unwrap().into(), &packet).await.unwrap();

        let mut buf = [0u8; 1500];
        let (n, _) = receiver.recv_from(&mut buf).await.unwrap();
        assert_eq!(MeasurementPacket::deser(&mut &buf[..n]).unwrap(), packet);
    }
}
