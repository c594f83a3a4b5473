use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info_span, Instrument};
use crate::config::ServerConfig;
use crate::error::MeasurementError;
use crate::protocol::client_id::ClientIdentifier;
use crate::protocol::measurement_packet::MeasurementPacket;
use crate::server::send_socket::{send_measurement_packet, SendSocket};
use crate::util::time::millis_since_epoch;

/// A validated downlink REQUEST: what the client asked the server to send
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DownlinkRequest {
    pub burst_count: i32,
    pub packet_size: i32,
    pub udp_interval: Duration,
}

impl DownlinkRequest {
    pub fn from_packet(packet: &MeasurementPacket, config: &ServerConfig) -> Result<DownlinkRequest, MeasurementError> {
        if packet.burst_count < 1 {
            return Err(MeasurementError::Validation {
                reason: format!("burst count should be positive, not {}", packet.burst_count),
            });
        }
        if packet.burst_count > config.max_burst_count {
            return Err(MeasurementError::Validation {
                reason: format!("burst count should not be bigger than {}, not {}", config.max_burst_count, packet.burst_count),
            });
        }
        if packet.packet_size < config.min_packet_size {
            return Err(MeasurementError::Validation {
                reason: format!("requested packet size {} is shorter than the minimum packet size {}", packet.packet_size, config.min_packet_size),
            });
        }
        if packet.packet_size > config.max_packet_size {
            return Err(MeasurementError::Validation {
                reason: format!("requested packet size {} is longer than the maximum packet size {}", packet.packet_size, config.max_packet_size),
            });
        }

        Ok(DownlinkRequest {
            burst_count: packet.burst_count,
            packet_size: packet.packet_size,
            // a negative interval means 'no pause'
            udp_interval: Duration::from_millis(u64::try_from(packet.udp_interval).unwrap_or(0)),
        })
    }
}

/// Sends one downlink burst to one client, independently of the receive loop and of other
///  downlink bursts, and terminates when the burst is sent.
///
/// There is no end-of-burst signal: the client knows the burst is complete when it received
///  `burst_count` packets, or by its own timeout. A failed send terminates the burst early
///  without retry.
pub struct DownlinkSender {
    send_socket: Arc<dyn SendSocket>,
    client_id: ClientIdentifier,
    request: DownlinkRequest,
}

impl DownlinkSender {
    pub fn new(send_socket: Arc<dyn SendSocket>, client_id: ClientIdentifier, request: DownlinkRequest) -> DownlinkSender {
        DownlinkSender {
            send_socket,
            client_id,
            request,
        }
    }

    /// Runs the burst as a separate task. No handle is kept - the task can not be cancelled and
    ///  runs until the burst is sent or a send fails.
    ///
    /// NB: There is no limit on the number of concurrently running downlink bursts
    pub fn spawn(self) {
        let span = info_span!("downlink", client = %self.client_id, burst_count = self.request.burst_count);
        tokio::spawn(self.run().instrument(span));
    }

    pub async fn run(self) {
        for packet_num in 0..self.request.burst_count {
            if packet_num > 0 {
                // best effort: a late wakeup delays the rest of the burst, there is no catching up
                sleep(self.request.udp_interval).await;
            }

            let packet = MeasurementPacket::data(
                self.request.burst_count,
                packet_num,
                millis_since_epoch(),
                self.request.packet_size,
            );

            if let Err(e) = send_measurement_packet(self.send_socket.as_ref(), self.client_id, &packet).await {
                error!("error sending downlink packet {} of {} to {}, aborting burst: {}", packet_num, self.request.burst_count, self.client_id, e);
                return;
            }
        }

        debug!("downlink burst of {} packets to {} finished", self.request.burst_count, self.client_id);
    }
}
