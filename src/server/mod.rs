pub mod downlink;
pub mod packet_processor;
pub mod send_socket;
pub mod udp_server;
