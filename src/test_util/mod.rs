//! Utilities for unit tests: constructing client ids and packets, and a send socket that
//!  records what was sent instead of putting it on the wire.

pub mod packet;
pub mod send_socket;
