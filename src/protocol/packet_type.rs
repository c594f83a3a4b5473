use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The type code in the first four bytes of every packet.
#[repr(i32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, TryFromPrimitive, IntoPrimitive)]
pub enum PacketType {
    /// server -> client: the previous packet was not acceptable
    Error = 1,
    /// server -> client: statistics for an uplink burst
    Response = 2,
    /// uplink (client -> server) or downlink (server -> client) burst packet
    Data = 3,
    /// client -> server: request for a downlink burst
    Request = 4,
}
