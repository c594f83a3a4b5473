use std::fmt::{Debug, Display, Formatter};
use std::net::{IpAddr, SocketAddr};

/// Identifies a client by the source address and port of its datagrams. This is the key that
///  correlates the packets of one uplink burst.
///
/// Equality and hashing are purely structural on address bytes and port. IPV6 flow info and
///  scope id are not part of the identity.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ClientIdentifier {
    pub ip: IpAddr,
    pub port: u16,
}

impl ClientIdentifier {
    pub fn new(ip: IpAddr, port: u16) -> ClientIdentifier {
        ClientIdentifier { ip, port }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}

impl From<SocketAddr> for ClientIdentifier {
    fn from(addr: SocketAddr) -> Self {
        ClientIdentifier {
            ip: addr.ip(),
            port: addr.port(),
        }
    }
}

impl Display for ClientIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.socket_addr())
    }
}

impl Debug for ClientIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.socket_addr())
    }
}
