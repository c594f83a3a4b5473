pub mod client_id;
pub mod measurement_packet;
pub mod packet_type;
