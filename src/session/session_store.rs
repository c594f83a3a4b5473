use std::collections::hash_map::Entry;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};
use crate::error::{MeasurementError, ProtocolViolation};
use crate::protocol::client_id::ClientIdentifier;
use crate::protocol::measurement_packet::MeasurementPacket;
use crate::session::client_session::ClientSession;

#[derive(Debug)]
pub enum RecordOutcome {
    /// the sample was added, and the burst is still in progress
    Accumulating,
    /// the sample completed the burst, and the session was removed from the store
    Complete(ClientSession),
}

/// Holds the in-progress uplink sessions, at most one per client.
///
/// NB: The store is owned by the receive loop and is *only* ever accessed from there, which is
///      why it is a plain map without any synchronization. Downlink senders never touch it.
///
/// Per client, the states are 'absent' and 'accumulating':
/// * absent -> accumulating: first DATA packet of a burst
/// * accumulating -> accumulating: DATA packet with the session's `seq`
/// * accumulating -> absent: burst complete, `seq` mismatch, or flushed on receive timeout
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: FxHashMap<ClientIdentifier, ClientSession>,
}

impl SessionStore {
    pub fn new() -> SessionStore {
        Default::default()
    }

    /// Records a DATA packet's sample in its client's session, creating the session if this is
    ///  the burst's first packet.
    ///
    /// A packet with a `seq` other than the session's is a protocol violation: the session is
    ///  discarded, and the packet is not recorded anywhere.
    pub fn record_data(&mut self, client_id: ClientIdentifier, packet: &MeasurementPacket, offsetted_delay: i64) -> Result<RecordOutcome, MeasurementError> {
        let is_complete = match self.sessions.entry(client_id) {
            Entry::Vacant(e) => {
                debug!("new uplink session for {} - seq {}, burst count {}", client_id, packet.seq, packet.burst_count);
                e.insert(ClientSession::new(packet, offsetted_delay))
                    .is_complete()
            }
            Entry::Occupied(mut e) => {
                if e.get().seq != packet.seq {
                    let session = e.remove();
                    warn!("client {} sent a different seq in the middle of a burst: {} => {} - discarding session with {} received packets", client_id, session.seq, packet.seq, session.num_received());
                    return Err(ProtocolViolation::SeqMismatch { expected: session.seq, actual: packet.seq }.into());
                }

                let session = e.get_mut();
                session.add_sample(packet.packet_num, offsetted_delay);
                session.is_complete()
            }
        };

        info!("received data packet from {} s:{} b:{} p:{}", client_id, packet.seq, packet.burst_count, packet.packet_num);

        if is_complete {
            if let Some(session) = self.sessions.remove(&client_id) {
                return Ok(RecordOutcome::Complete(session));
            }
        }
        Ok(RecordOutcome::Accumulating)
    }

    /// removes all sessions, returning them
    pub fn drain(&mut self) -> Vec<(ClientIdentifier, ClientSession)> {
        self.sessions.drain().collect()
    }

    pub fn get(&self, client_id: &ClientIdentifier) -> Option<&ClientSession> {
        self.sessions.get(client_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
