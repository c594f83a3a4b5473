use tokio::time::Instant;
use crate::protocol::measurement_packet::MeasurementPacket;
use crate::session::statistics::{inversion_count, jitter};

/// Server side accumulator for one in-progress uplink burst of one client.
///
/// Samples are kept in arrival order and are neither sorted nor deduplicated: disorder and
///  loss are what is being measured.
#[derive(Debug)]
pub struct ClientSession {
    pub seq: i32,
    pub burst_count: i32,
    pub packet_size: i32,
    pub last_update: Instant,
    received_packet_nums: Vec<i32>,
    /// parallel to `received_packet_nums`
    offsetted_delays: Vec<i64>,
}

impl ClientSession {
    /// creates a session, seeded from the burst's first DATA packet
    pub fn new(first_packet: &MeasurementPacket, offsetted_delay: i64) -> ClientSession {
        ClientSession {
            seq: first_packet.seq,
            burst_count: first_packet.burst_count,
            packet_size: first_packet.packet_size,
            last_update: Instant::now(),
            received_packet_nums: vec![first_packet.packet_num],
            offsetted_delays: vec![offsetted_delay],
        }
    }

    pub fn add_sample(&mut self, packet_num: i32, offsetted_delay: i64) {
        self.received_packet_nums.push(packet_num);
        self.offsetted_delays.push(offsetted_delay);
        self.last_update = Instant::now();
    }

    pub fn num_received(&self) -> usize {
        self.received_packet_nums.len()
    }

    pub fn received_packet_nums(&self) -> &[i32] {
        &self.received_packet_nums
    }

    pub fn offsetted_delays(&self) -> &[i64] {
        &self.offsetted_delays
    }

    /// A session is complete when it holds exactly `burst_count` samples. A non-positive
    ///  burst count can never be reached.
    pub fn is_complete(&self) -> bool {
        usize::try_from(self.burst_count)
            .map_or(false, |burst_count| burst_count == self.num_received())
    }

    /// The RESPONSE packet for this burst, based on the samples received so far
    pub fn response_packet(&self) -> MeasurementPacket {
        MeasurementPacket::response(
            self.burst_count,
            saturating_i32(self.num_received() as u64),
            saturating_i32(inversion_count(&self.received_packet_nums)),
            jitter(&self.offsetted_delays),
            self.packet_size,
        )
    }
}

fn saturating_i32(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::packet_type::PacketType;
    use crate::test_util::packet::data_packet;

    #[test]
    fn test_new() {
        let session = ClientSession::new(&data_packet(1024, 16, 3), 25);

        assert_eq!(session.seq, 1024);
        assert_eq!(session.burst_count, 16);
        assert_eq!(session.packet_size, 100);
        assert_eq!(session.received_packet_nums(), &[3]);
        assert_eq!(session.offsetted_delays(), &[25]);
        assert!(!session.is_complete());
    }

    #[test]
    fn test_add_sample_keeps_arrival_order() {
        let mut session = ClientSession::new(&data_packet(1, 5, 2), 10);
        session.add_sample(0, 11);
        session.add_sample(2, 12);
        session.add_sample(1, 13);

        assert_eq!(session.received_packet_nums(), &[2, 0, 2, 1]);
        assert_eq!(session.offsetted_delays(), &[10, 11, 12, 13]);
        assert_eq!(session.num_received(), 4);
    }

    #[test]
    fn test_is_complete() {
        let mut session = ClientSession::new(&data_packet(1, 3, 0), 0);
        assert!(!session.is_complete());
        session.add_sample(1, 0);
        assert!(!session.is_complete());
        session.add_sample(2, 0);
        assert!(session.is_complete());
    }

    #[test]
    fn test_single_packet_burst_is_complete() {
        assert!(ClientSession::new(&data_packet(1, 1, 0), 0).is_complete());
    }

    #[test]
    fn test_non_positive_burst_count_never_completes() {
        assert!(!ClientSession::new(&data_packet(1, 0, 0), 0).is_complete());

        let mut session = ClientSession::new(&data_packet(1, -1, 0), 0);
        session.add_sample(1, 0);
        assert!(!session.is_complete());
    }

    #[test]
    fn test_response_packet() {
        let mut session = ClientSession::new(&data_packet(7, 6, 2), 1);
        session.add_sample(3, -4);
        session.add_sample(8, 8);
        session.add_sample(6, 10);
        session.add_sample(1, -8);

        let response = session.response_packet();
        assert_eq!(response.packet_type().ok(), Some(PacketType::Response));
        assert_eq!(response.burst_count, 6);
        assert_eq!(response.packet_num, 5);
        assert_eq!(response.interval_num, 5);
        assert_eq!(response.timestamp, 7);
        assert_eq!(response.packet_size, 100);
        assert_eq!(response.seq, 0);
        assert_eq!(response.udp_interval, 0);
    }

    #[test]
    fn test_saturating_i32() {
        assert_eq!(saturating_i32(5), 5);
        assert_eq!(saturating_i32(i32::MAX as u64 + 1), i32::MAX);
    }
}
