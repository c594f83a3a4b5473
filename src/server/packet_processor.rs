use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, span, trace, warn, Instrument, Level};
use crate::config::ServerConfig;
use crate::error::{MeasurementError, ProtocolViolation};
use crate::protocol::client_id::ClientIdentifier;
use crate::protocol::measurement_packet::MeasurementPacket;
use crate::protocol::packet_type::PacketType;
use crate::server::downlink::{DownlinkRequest, DownlinkSender};
use crate::server::send_socket::{send_measurement_packet, SendSocket};
use crate::session::client_session::ClientSession;
use crate::session::session_store::{RecordOutcome, SessionStore};
use crate::util::time::millis_since_epoch;

/// Handles received datagrams: decodes them, keeps track of uplink sessions, replies to clients
///  and starts downlink bursts.
///
/// The processor owns the [SessionStore] and is driven exclusively by the receive loop, so
///  session state is only ever touched from a single task. That is what allows the store to
///  be a plain map.
pub struct PacketProcessor {
    config: Arc<ServerConfig>,
    send_socket: Arc<dyn SendSocket>,
    sessions: SessionStore,
}

impl PacketProcessor {
    pub fn new(config: Arc<ServerConfig>, send_socket: Arc<dyn SendSocket>) -> PacketProcessor {
        PacketProcessor {
            config,
            send_socket,
            sessions: SessionStore::new(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Entry point for every received datagram. Failures are logged here and never propagate
    ///  to the receive loop.
    pub async fn on_datagram(&mut self, from: SocketAddr, buf: &[u8]) {
        let client_id = ClientIdentifier::from(from);
        let span = span!(Level::DEBUG, "datagram", client = %client_id);

        async {
            info!("received datagram from {}, len {}", client_id, buf.len());

            let packet = match MeasurementPacket::deser(&mut &buf[..]) {
                Ok(packet) => packet,
                Err(e) => {
                    warn!("dropping datagram from {}: {}", client_id, e);
                    return;
                }
            };

            if let Err(e) = self.process_packet(client_id, &packet).await {
                match e {
                    MeasurementError::Transport(_) => error!("error processing packet from {}: {}", client_id, e),
                    _ => warn!("error processing packet from {}: {}", client_id, e),
                }
            }
        }.instrument(span).await
    }

    /// Dispatches a decoded packet by its type:
    /// * DATA is recorded in the client's uplink session, sending the RESPONSE if that completes
    ///    the burst
    /// * REQUEST is validated and starts a downlink burst
    /// * anything else is answered with an ERROR packet
    pub async fn process_packet(&mut self, client_id: ClientIdentifier, packet: &MeasurementPacket) -> Result<(), MeasurementError> {
        match packet.packet_type() {
            Ok(PacketType::Data) => self.on_data_packet(client_id, packet).await,
            Ok(PacketType::Request) => self.on_request_packet(client_id, packet),
            Ok(PacketType::Error) | Ok(PacketType::Response) | Err(_) => {
                self.send_error(client_id).await;
                Err(ProtocolViolation::UnexpectedPacketType(packet.type_code).into())
            }
        }
    }

    async fn on_data_packet(&mut self, client_id: ClientIdentifier, packet: &MeasurementPacket) -> Result<(), MeasurementError> {
        // contains the (unknown) offset between client and server clocks
        let offsetted_delay = millis_since_epoch().wrapping_sub(packet.timestamp);

        match self.sessions.record_data(client_id, packet, offsetted_delay) {
            Ok(RecordOutcome::Accumulating) => Ok(()),
            Ok(RecordOutcome::Complete(session)) => {
                // the session was removed from the store, whether sending the response works or not
                self.send_response(client_id, &session).await
            }
            Err(e @ MeasurementError::Protocol { .. }) => {
                self.send_error(client_id).await;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    fn on_request_packet(&self, client_id: ClientIdentifier, packet: &MeasurementPacket) -> Result<(), MeasurementError> {
        let request = DownlinkRequest::from_packet(packet, &self.config)?;

        info!("starting downlink burst to {}: {} packets of {} bytes every {:?}", client_id, request.burst_count, request.packet_size, request.udp_interval);
        DownlinkSender::new(self.send_socket.clone(), client_id, request)
            .spawn();
        Ok(())
    }

    /// Called when the receive loop times out: *all* open sessions are flushed, i.e. they are
    ///  removed, and a RESPONSE with the statistics so far is sent for each of them. This
    ///  includes sessions that were updated just before the timeout.
    pub async fn on_receive_timeout(&mut self) {
        if self.sessions.is_empty() {
            trace!("receive timeout, no open sessions");
            return;
        }

        info!("receive timeout - flushing {} open session(s)", self.sessions.len());
        for (client_id, session) in self.sessions.drain() {
            debug!("flushing session of {} with {} of {} packets, last update {:?} ago", client_id, session.num_received(), session.burst_count, session.last_update.elapsed());

            if let Err(e) = self.send_response(client_id, &session).await {
                error!("error sending response to {} on timeout: {}", client_id, e);
            }
        }
    }

    async fn send_response(&self, client_id: ClientIdentifier, session: &ClientSession) -> Result<(), MeasurementError> {
        send_measurement_packet(self.send_socket.as_ref(), client_id, &session.response_packet()).await
    }

    async fn send_error(&self, client_id: ClientIdentifier) {
        if let Err(e) = send_measurement_packet(self.send_socket.as_ref(), client_id, &MeasurementPacket::error(self.config.min_packet_size)).await {
            error!("error sending ERROR packet to {}: {}", client_id, e);
        }
    }
}
