//! IPv4 protocol implementation
//!
//! This module provides IPv4 header parsing, validation and serialization.
//!
//! Features:
//! - IPv4 header parsing with length checks against the captured bytes
//! - Checksum validation and calculation
//! - Header creation for replies with automatic checksum
//! - Options are skipped by length, never interpreted

use std::fmt;
use std::net::Ipv4Addr;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Layer, Result, Unsupported};
use crate::network::checksum;

/// Minimum IPv4 header length in bytes
pub const IPV4_HEADER_LEN: usize = 20;
const IPV4_VERSION: u8 = 4;
const DEFAULT_IHL: u8 = 5; // 5 * 4 = 20 bytes (standard header length)

/// TTL stamped on every datagram this responder originates
pub const DEFAULT_TTL: u8 = 64;

/// Upper-layer protocol carried by an IPv4 datagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpProtocol {
    Icmp,
    Tcp,
    Udp,
    Other(u8),
}

impl IpProtocol {
    pub const ICMP: u8 = 1;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;

    pub fn id(self) -> u8 {
        match self {
            IpProtocol::Icmp => Self::ICMP,
            IpProtocol::Tcp => Self::TCP,
            IpProtocol::Udp => Self::UDP,
            IpProtocol::Other(id) => id,
        }
    }
}

impl From<u8> for IpProtocol {
    fn from(id: u8) -> Self {
        match id {
            Self::ICMP => IpProtocol::Icmp,
            Self::TCP => IpProtocol::Tcp,
            Self::UDP => IpProtocol::Udp,
            other => IpProtocol::Other(other),
        }
    }
}

impl fmt::Display for IpProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpProtocol::Icmp => f.write_str("icmp"),
            IpProtocol::Tcp => f.write_str("tcp"),
            IpProtocol::Udp => f.write_str("udp"),
            IpProtocol::Other(id) => write!(f, "proto {}", id),
        }
    }
}

/// IPv4 flags constants
pub mod flags {
    pub const DONT_FRAGMENT: u16 = 0x4000;
    pub const MORE_FRAGMENTS: u16 = 0x2000;
    pub const FRAGMENT_OFFSET_MASK: u16 = 0x1FFF;
}

/// IPv4 packet header structure
///
/// Represents the IPv4 header as defined in RFC 791. Options, if any, stay in
/// the captured buffer and are only accounted for by `header_len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Header {
    pub version: u8,
    pub ihl: u8,      // Internet Header Length
    pub dscp_ecn: u8, // Differentiated services and congestion notification
    pub total_len: u16,
    pub id: u16,
    pub flags_frag_offset: u16, // Flags and Fragment Offset
    pub ttl: u8,                // Time to Live
    pub protocol: IpProtocol,   // Next Protocol
    pub checksum: u16,
    pub src_addr: Ipv4Addr,
    pub dst_addr: Ipv4Addr,
}

impl Ipv4Header {
    /// Create an option-less header with default values
    ///
    /// Only requires the essential parameters. The checksum is left at zero;
    /// call `update_checksum` or use `create_packet`.
    pub fn new_simple(
        protocol: IpProtocol,
        src_addr: Ipv4Addr,
        dst_addr: Ipv4Addr,
        id: u16,
        payload_len: u16,
    ) -> Self {
        Ipv4Header {
            version: IPV4_VERSION,
            ihl: DEFAULT_IHL,
            dscp_ecn: 0,
            total_len: IPV4_HEADER_LEN as u16 + payload_len,
            id,
            flags_frag_offset: 0,
            ttl: DEFAULT_TTL,
            protocol,
            checksum: 0,
            src_addr,
            dst_addr,
        }
    }

    /// Parse IPv4 header from byte slice
    ///
    /// Fails if the data is shorter than the fixed header, than the declared
    /// header length, or than the declared total length. A version other
    /// than 4 is unsupported. The checksum is not checked here.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < IPV4_HEADER_LEN {
            return Err(Error::truncated(Layer::Ipv4, data.len(), IPV4_HEADER_LEN));
        }

        let version = data[0] >> 4;
        if version != IPV4_VERSION {
            return Err(Unsupported::IpVersion(version).into());
        }

        let header = Ipv4Header {
            version,
            ihl: data[0] & 0x0F,
            dscp_ecn: data[1],
            total_len: BigEndian::read_u16(&data[2..4]),
            id: BigEndian::read_u16(&data[4..6]),
            flags_frag_offset: BigEndian::read_u16(&data[6..8]),
            ttl: data[8],
            protocol: IpProtocol::from(data[9]),
            checksum: BigEndian::read_u16(&data[10..12]),
            src_addr: Ipv4Addr::new(data[12], data[13], data[14], data[15]),
            dst_addr: Ipv4Addr::new(data[16], data[17], data[18], data[19]),
        };

        let header_len = header.header_len();
        if header_len < IPV4_HEADER_LEN {
            return Err(Error::truncated(Layer::Ipv4, header_len, IPV4_HEADER_LEN));
        }
        if header_len > data.len() {
            return Err(Error::truncated(Layer::Ipv4, data.len(), header_len));
        }
        let total_len = header.total_len as usize;
        if total_len < header_len {
            return Err(Error::truncated(Layer::Ipv4, total_len, header_len));
        }
        if total_len > data.len() {
            return Err(Error::truncated(Layer::Ipv4, data.len(), total_len));
        }

        Ok(header)
    }

    /// Validate the header checksum over the raw header bytes, options included
    ///
    /// `data` must start with this header.
    pub fn validate_checksum(&self, data: &[u8]) -> Result<()> {
        let header_len = self.header_len().min(data.len());
        match checksum(0, &data[..header_len]) {
            0 => Ok(()),
            sum => Err(Error::ChecksumMismatch {
                layer: Layer::Ipv4,
                sum,
            }),
        }
    }

    /// Update checksum after modifying header fields
    ///
    /// Only valid for option-less headers, which are the only kind serialized.
    pub fn update_checksum(&mut self) {
        self.checksum = 0;
        self.checksum = checksum(0, &self.to_bytes());
    }

    /// Convert IPv4 header to bytes
    ///
    /// Serializes the fixed 20-byte header; options are never emitted.
    pub fn to_bytes(&self) -> [u8; IPV4_HEADER_LEN] {
        let mut bytes = [0u8; IPV4_HEADER_LEN];
        bytes[0] = (self.version << 4) | self.ihl;
        bytes[1] = self.dscp_ecn;
        BigEndian::write_u16(&mut bytes[2..4], self.total_len);
        BigEndian::write_u16(&mut bytes[4..6], self.id);
        BigEndian::write_u16(&mut bytes[6..8], self.flags_frag_offset);
        bytes[8] = self.ttl;
        bytes[9] = self.protocol.id();
        BigEndian::write_u16(&mut bytes[10..12], self.checksum);
        bytes[12..16].copy_from_slice(&self.src_addr.octets());
        bytes[16..20].copy_from_slice(&self.dst_addr.octets());

        bytes
    }

    /// Create a complete option-less datagram carrying `payload`
    ///
    /// The total length and checksum are recomputed.
    pub fn create_packet(&self, payload: &[u8]) -> Vec<u8> {
        let mut header = self.clone();
        header.ihl = DEFAULT_IHL;
        header.total_len = (IPV4_HEADER_LEN + payload.len()) as u16;
        header.update_checksum();
        let mut packet = Vec::with_capacity(header.total_len as usize);
        packet.extend_from_slice(&header.to_bytes());
        packet.extend_from_slice(payload);
        packet
    }

    /// Get the header length in bytes
    pub fn header_len(&self) -> usize {
        (self.ihl as usize) * 4
    }

    /// Get payload length
    ///
    /// Returns the length of the payload (total length - header length)
    pub fn payload_len(&self) -> usize {
        (self.total_len as usize).saturating_sub(self.header_len())
    }

    pub fn dscp(&self) -> u8 {
        self.dscp_ecn >> 2
    }

    pub fn ecn(&self) -> u8 {
        self.dscp_ecn & 0x3
    }

    pub fn dont_fragment(&self) -> bool {
        self.flags_frag_offset & flags::DONT_FRAGMENT != 0
    }

    pub fn more_fragments(&self) -> bool {
        self.flags_frag_offset & flags::MORE_FRAGMENTS != 0
    }

    pub fn fragment_offset(&self) -> u16 {
        self.flags_frag_offset & flags::FRAGMENT_OFFSET_MASK
    }
}
