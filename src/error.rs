use std::fmt::{Display, Formatter};
use thiserror::Error;

/// The ways processing a single packet can fail. None of them is fatal for the receive loop;
///  the kind determines how the failure is reported:
///
/// * [MeasurementError::Protocol] - ERROR reply to the client, plus a log entry
/// * [MeasurementError::Decode], [MeasurementError::Validation] - log entry only, the client
///    gets no reply
/// * [MeasurementError::Transport] - log entry, the affected packet / burst is abandoned
#[derive(Debug, Error)]
pub enum MeasurementError {
    #[error("malformed packet: {reason}")]
    Decode { reason: String },
    #[error("invalid request: {reason}")]
    Validation { reason: String },
    #[error("protocol violation: {kind}")]
    Protocol { kind: ProtocolViolation },
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ProtocolViolation {
    /// The packet's type code is neither DATA nor REQUEST
    UnexpectedPacketType(i32),
    /// A client sent a DATA packet with a different `seq` in the middle of an uplink burst
    SeqMismatch { expected: i32, actual: i32 },
}

impl Display for ProtocolViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolViolation::UnexpectedPacketType(t) => write!(f, "unexpected packet type {}", t),
            ProtocolViolation::SeqMismatch { expected, actual } => write!(f, "seq changed in the middle of a burst: {} => {}", expected, actual),
        }
    }
}

impl From<ProtocolViolation> for MeasurementError {
    fn from(kind: ProtocolViolation) -> Self {
        MeasurementError::Protocol { kind }
    }
}
