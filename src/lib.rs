//! Server side of a UDP burst measurement protocol: clients send a burst of UDP packets to the
//!  server (uplink) or ask the server to send them a burst (downlink), and the server reports
//!  packet loss, reordering and jitter for uplink bursts.
//!
//! ## Design goals
//!
//! * Measure the network as it is: no retransmission, no congestion control, no deduplication
//!   or reordering of received packets - loss and disorder are what is being measured
//! * No clock synchronization between client and server. Jitter is derived from one-way delays
//!   that contain an unknown but constant clock offset, which cancels out in the standard deviation
//! * A single receive loop owns all per-client state, so there is no locking on the packet path
//! * Downlink bursts are paced independently of the receive loop so that a running downlink burst
//!   does not delay the processing (and timestamping) of concurrent uplink traffic
//! * explicitly *not* authenticated or encrypted, and there is no coordination between servers
//!
//! ## Packet layout
//!
//! All packets in both directions share a fixed header, all numbers in network byte order (BE):
//!
//! ```ascii
//!  0: type (i32)
//!      * 1 ERROR
//!      * 2 RESPONSE
//!      * 3 DATA
//!      * 4 REQUEST
//!  4: burst count (i32) - requested / declared number of packets in the burst
//!  8: packet number (i32) - 0-based index of this packet in its burst, or the number of
//!      received packets in a RESPONSE
//! 12: interval number (i32) - inversion count in a RESPONSE, unused otherwise
//! 16: timestamp (i64) - sender's wall clock in millis since epoch for DATA, jitter in millis
//!      for a RESPONSE
//! 24: packet size (i32) - total packet size including padding
//! 28: seq (i32) - burst id chosen by the client, constant for all packets of one burst
//! 32: UDP interval (i32) - requested pacing in millis for a downlink REQUEST
//! ```
//!
//! The header is 36 bytes long. Senders may pad packets beyond that to reach `packet size`;
//!  padding is ignored by the receiver.
//!
//! ## Exchanges
//!
//! *Uplink*: the client sends `burst count` DATA packets with the same `seq`. Once the server
//!  received all of them, or when the receive loop times out, it replies with a single RESPONSE
//!  carrying the number of received packets, the inversion count of their packet numbers in
//!  arrival order, and the jitter.
//!
//! *Downlink*: the client sends a single REQUEST, and the server sends `burst count` DATA packets
//!  of the requested size, pacing them `UDP interval` millis apart. There is no explicit end of
//!  burst marker.
//!
//! *ERROR* is sent in reply to packets of an unexpected type, and when a client changes its `seq`
//!  in the middle of an uplink burst.

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod session;
pub mod util;

#[cfg(test)]
pub mod test_util;
