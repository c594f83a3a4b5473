use std::net::Ipv4Addr;
use crate::protocol::client_id::ClientIdentifier;
use crate::protocol::measurement_packet::MeasurementPacket;
use crate::protocol::packet_type::PacketType;
use crate::util::time::millis_since_epoch;

/// convenience for unit test code: create a [ClientIdentifier] based on a number, the same number
///  generating the same id and different numbers different ids
pub fn client_id(number: u16) -> ClientIdentifier {
    ClientIdentifier::new(Ipv4Addr::new(192, 168, 1, 1).into(), 1000 + number)
}

/// an uplink DATA packet of 100 bytes, timestamped now
pub fn data_packet(seq: i32, burst_count: i32, packet_num: i32) -> MeasurementPacket {
    MeasurementPacket {
        seq,
        ..MeasurementPacket::data(burst_count, packet_num, millis_since_epoch(), 100)
    }
}

pub fn request_packet(burst_count: i32, packet_size: i32, udp_interval: i32) -> MeasurementPacket {
    MeasurementPacket {
        type_code: PacketType::Request.into(),
        burst_count,
        packet_size,
        udp_interval,
        ..Default::default()
    }
}
