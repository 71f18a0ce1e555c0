//! Error types shared by every layer of the pipeline.

use std::fmt;
use std::io;
use thiserror::Error;

/// A pipeline result.
pub type Result<T> = std::result::Result<T, Error>;

/// The protocol layer an error was detected at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Ethernet,
    Arp,
    Ipv4,
    Icmp,
    Tcp,
    Udp,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Ethernet => "Ethernet",
            Layer::Arp => "ARP",
            Layer::Ipv4 => "IPv4",
            Layer::Icmp => "ICMP",
            Layer::Tcp => "TCP",
            Layer::Udp => "UDP",
        };
        f.write_str(name)
    }
}

/// A well-formed field whose value this responder does not handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    EtherType(u16),
    /// ARP hardware type, protocol type, hardware length and protocol length.
    ArpFormat {
        htype: u16,
        ptype: u16,
        hlen: u8,
        plen: u8,
    },
    ArpOperation(u16),
    IpVersion(u8),
    IpProtocol(u8),
    IcmpType(u8),
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unsupported::EtherType(t) => write!(f, "ethertype 0x{:04x}", t),
            Unsupported::ArpFormat {
                htype,
                ptype,
                hlen,
                plen,
            } => write!(
                f,
                "ARP format htype {} ptype 0x{:04x} hlen {} plen {}",
                htype, ptype, hlen, plen
            ),
            Unsupported::ArpOperation(op) => write!(f, "ARP operation {}", op),
            Unsupported::IpVersion(v) => write!(f, "IP version {}", v),
            Unsupported::IpProtocol(p) => write!(f, "IP protocol {}", p),
            Unsupported::IcmpType(t) => write!(f, "ICMP type {}", t),
        }
    }
}

/// A pipeline error.
///
/// Everything but `Io` describes the received packet and is dropped at the
/// top-level dispatch. `Io` comes from the send path.
#[derive(Error, Debug)]
pub enum Error {
    #[error("short {layer} packet ({len} < {min})")]
    Truncated { layer: Layer, len: usize, min: usize },
    #[error("invalid {layer} checksum 0x{sum:04x}")]
    ChecksumMismatch { layer: Layer, sum: u16 },
    #[error("unsupported {0}")]
    Unsupported(Unsupported),
    #[error("transmit failed: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn truncated(layer: Layer, len: usize, min: usize) -> Self {
        Error::Truncated { layer, len, min }
    }

    /// True when the error was caused by the received bytes rather than the send path.
    pub fn is_dissection(&self) -> bool {
        !matches!(self, Error::Io(_))
    }
}

impl From<Unsupported> for Error {
    fn from(u: Unsupported) -> Self {
        Error::Unsupported(u)
    }
}
