use std::fmt::{Display, Formatter};
use bytes::{Buf, BufMut, BytesMut};
use num_enum::{TryFromPrimitive, TryFromPrimitiveError};
use crate::error::MeasurementError;
use crate::protocol::packet_type::PacketType;

/// The fixed header shared by all packets of the protocol (see the crate documentation for the
///  wire layout). This is a pure framing layer without knowledge of sessions: it neither
///  validates field values nor interprets the type code.
///
/// The meaning of some fields depends on the packet type - most notably, a RESPONSE carries the
///  inversion count in `interval_num` and the jitter in `timestamp`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MeasurementPacket {
    /// raw type code, kept as-is so that packets with an unknown type can still be decoded and
    ///  answered with an ERROR
    pub type_code: i32,
    pub burst_count: i32,
    pub packet_num: i32,
    pub interval_num: i32,
    pub timestamp: i64,
    pub packet_size: i32,
    pub seq: i32,
    pub udp_interval: i32,
}

impl MeasurementPacket {
    pub const SERIALIZED_LEN: usize = 7 * size_of::<i32>() + size_of::<i64>();
    pub const SERIALIZED_LEN_I32: i32 = Self::SERIALIZED_LEN as i32;

    /// The ERROR packet is the same for all kinds of errors: `packet_size` is the server's
    ///  configured minimum packet size, all other fields are zero
    pub fn error(min_packet_size: i32) -> MeasurementPacket {
        MeasurementPacket {
            type_code: PacketType::Error.into(),
            packet_size: min_packet_size,
            ..Default::default()
        }
    }

    pub fn data(burst_count: i32, packet_num: i32, timestamp: i64, packet_size: i32) -> MeasurementPacket {
        MeasurementPacket {
            type_code: PacketType::Data.into(),
            burst_count,
            packet_num,
            timestamp,
            packet_size,
            ..Default::default()
        }
    }

    pub fn response(burst_count: i32, num_received: i32, inversion_count: i32, jitter_millis: i64, packet_size: i32) -> MeasurementPacket {
        MeasurementPacket {
            type_code: PacketType::Response.into(),
            burst_count,
            packet_num: num_received,
            interval_num: inversion_count,
            timestamp: jitter_millis,
            packet_size,
            ..Default::default()
        }
    }

    pub fn packet_type(&self) -> Result<PacketType, TryFromPrimitiveError<PacketType>> {
        PacketType::try_from_primitive(self.type_code)
    }

    /// Writes the 36 header bytes. Padding up to `packet_size` is not written - that is the
    ///  sender's concern if it wants to reach a specific packet size.
    pub fn ser(&self, buf: &mut BytesMut) {
        buf.put_i32(self.type_code);
        buf.put_i32(self.burst_count);
        buf.put_i32(self.packet_num);
        buf.put_i32(self.interval_num);
        buf.put_i64(self.timestamp);
        buf.put_i32(self.packet_size);
        buf.put_i32(self.seq);
        buf.put_i32(self.udp_interval);
    }

    /// Reads the header, leaving any padding after it in the buffer
    pub fn deser(buf: &mut impl Buf) -> Result<MeasurementPacket, MeasurementError> {
        if buf.remaining() < Self::SERIALIZED_LEN {
            return Err(MeasurementError::Decode {
                reason: format!("packet has {} bytes, header requires {}", buf.remaining(), Self::SERIALIZED_LEN),
            });
        }

        Ok(MeasurementPacket {
            type_code: buf.get_i32(),
            burst_count: buf.get_i32(),
            packet_num: buf.get_i32(),
            interval_num: buf.get_i32(),
            timestamp: buf.get_i64(),
            packet_size: buf.get_i32(),
            seq: buf.get_i32(),
            udp_interval: buf.get_i32(),
        })
    }

    pub fn to_buf(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(Self::SERIALIZED_LEN);
        self.ser(&mut buf);
        buf
    }
}

impl Display for MeasurementPacket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.packet_type() {
            Ok(t) => write!(f, "{:?}", t)?,
            Err(_) => write!(f, "type:{}", self.type_code)?,
        }
        write!(f, " b:{} p:{} i:{} j:{} s:{}", self.burst_count, self.packet_num, self.interval_num, self.timestamp, self.packet_size)
    }
}
